//! Graph backend access.
//!
//! This module provides:
//! - [`GraphBackend`]: the seam the navigator fetches through
//! - [`HttpBackend`]: the reqwest implementation against the navigator's
//!   HTTP endpoints
//! - Wire types for the details endpoint and URL builders

mod client;
mod types;


pub use client::*;
pub use types::*;

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::view::{DetailsReply, Mode, NodeRef, TreeFragment};

/// Source of tree fragments and node details.
///
/// Implementations never retry; every call is exactly one request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Fetch the navigation tree for `mode`.
    async fn fetch_navigation(&self, mode: Mode) -> FetchResult<TreeFragment>;

    /// Fetch the outgoing properties of `id` under `mode`.
    async fn fetch_details(&self, id: &NodeRef, mode: Mode) -> FetchResult<DetailsReply>;
}
