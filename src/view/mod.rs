//! View state of the navigator.
//!
//! This module provides:
//! - [`Mode`] and [`NodeRef`], the values threaded through every request
//! - [`TreeState`]: expansion and selection of the rendered tree
//! - [`TreeFragment`]: the swapped-in tree markup and its node outline
//! - [`DetailsState`]: the details panel and its in-flight load tracking
//! - HTML projections of all of the above

mod details;
mod fragment;
mod generation;
mod render;
mod tree;

pub use details::*;
pub use fragment::*;
pub use generation::*;
pub use render::*;
pub use tree::*;

use serde::{Deserialize, Serialize};

/// Which view of the graph is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Only explicitly stated facts.
    #[default]
    Asserted,
    /// Stated facts plus those derived by reasoning.
    Inferred,
}

impl Mode {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Asserted => "asserted",
            Mode::Inferred => "inferred",
        }
    }

    /// Whether requests should ask the backend for inferred facts.
    pub fn is_inferred(&self) -> bool {
        matches!(self, Mode::Inferred)
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            Mode::Asserted => Mode::Inferred,
            Mode::Inferred => Mode::Asserted,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asserted" => Ok(Mode::Asserted),
            "inferred" => Ok(Mode::Inferred),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

/// Identifier of a graph resource, normally a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRef(String);

impl NodeRef {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing fragment or path segment of the identifier.
    pub fn local_name(&self) -> &str {
        local_name(&self.0)
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Short display name for a URI or compact id.
///
/// Takes whatever follows the last `#`, then the last `/`, then the last `:`.
/// Falls back to the whole input when that tail is empty.
pub fn local_name(uri: &str) -> &str {
    let tail = uri.rsplit('#').next().unwrap_or(uri);
    let tail = tail.rsplit('/').next().unwrap_or(tail);
    let tail = tail.rsplit(':').next().unwrap_or(tail);
    if tail.is_empty() {
        uri
    } else {
        tail
    }
}
