//! # Ontology Navigator
//!
//! View-state synchronization engine for an ontology browser: a collapsible
//! tree of graph nodes, a details panel for the selected node, and a toggle
//! between the asserted and inferred views of the graph.
//!
//! ## Features
//!
//! - **Mode Controller**: switching views reloads the tree and clears details
//! - **Tree Loader**: whole-fragment swap of the server-rendered tree
//! - **Expansion/Selection State**: exclusive selection, involutive expansion
//! - **Details Loader**: property rows, cross-references, "Describe Axiom"
//! - **Last-issued-wins**: stale responses never clobber newer ones
//!
//! ## Architecture
//!
//! ```text
//! Host events → Navigator ─┬─ TreeState    ─┐
//!                          └─ DetailsState ─┴→ HTML projections
//!                  ↓
//!            GraphBackend (HTTP)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use ontology_navigator::{Config, Mode, Navigator, NodeRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     ontology_navigator::telemetry::init_logging(&config.logging)?;
//!     let navigator = Navigator::from_config(&config)?;
//!     navigator.reload(navigator.mode()).await;
//!     navigator.click_node(NodeRef::new("http://example.org/rg#Marriage")).await;
//!     navigator.set_mode(Mode::Inferred).await;
//!     println!("{}", navigator.render_details());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Backend client and wire types.
pub mod backend;
/// Configuration management.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Navigator session: mode controller and loaders.
pub mod navigator;
/// Logging setup.
pub mod telemetry;
/// Tree, selection and details state plus their projections.
pub mod view;

pub use config::Config;
pub use error::{AppError, AppResult, FetchError, FetchResult};
pub use navigator::Navigator;
pub use view::{Mode, NodeRef};
