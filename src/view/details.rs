//! Details panel state and the details loader's completion logic.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{local_name, Generation, GenerationCounter, Mode, NodeRef};
use crate::error::FetchResult;

/// Placeholder shown when no node is being inspected.
pub const EMPTY_DETAILS_TEXT: &str = "Select a node to view details";
/// Placeholder shown while a load is pending.
pub const LOADING_TEXT: &str = "Loading...";
/// Generic text shown for network, status and parse failures.
pub const FAILED_DETAILS_TEXT: &str = "Failed to load details.";

/// One outgoing property of a node, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRow {
    /// Predicate URI.
    pub predicate_id: String,
    /// Human label of the predicate, when the backend resolved one.
    pub predicate_label: Option<String>,
    /// Object URI or literal value.
    pub object_value: String,
    /// Human label of the object, when the backend resolved one.
    pub object_label: Option<String>,
    /// Whether `object_value` names another graph resource.
    pub is_uri_value: bool,
}

impl PropertyRow {
    /// Row label: the predicate label, else its local name.
    pub fn label(&self) -> String {
        match &self.predicate_label {
            Some(label) => label.clone(),
            None => local_name(&self.predicate_id).to_string(),
        }
    }

    /// Row value as displayed.
    pub fn value(&self) -> RowValue {
        if self.is_uri_value {
            RowValue::Reference {
                target: NodeRef::new(self.object_value.clone()),
                text: self
                    .object_label
                    .clone()
                    .unwrap_or_else(|| local_name(&self.object_value).to_string()),
            }
        } else {
            RowValue::Literal(
                self.object_label
                    .clone()
                    .unwrap_or_else(|| self.object_value.clone()),
            )
        }
    }
}

/// Properties of a single node as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsView {
    /// Node the properties belong to.
    pub id: NodeRef,
    /// Outgoing properties, backend order preserved.
    pub properties: Vec<PropertyRow>,
}

/// Interpreted body of a successful details response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsReply {
    /// Properties to display.
    View(DetailsView),
    /// Backend-authored error for the requested id.
    Error {
        /// Node the error refers to.
        id: NodeRef,
        /// Message, shown verbatim.
        message: String,
    },
}

/// A row value as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    /// Clickable link to another node, followed with the current mode.
    Reference {
        /// Node loaded when the link is followed.
        target: NodeRef,
        /// Link text.
        text: String,
    },
    /// Plain text.
    Literal(String),
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Predicate label.
    pub label: String,
    /// Object value.
    pub value: RowValue,
}

/// Projection of a [`DetailsView`] for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsCard {
    /// Node shown.
    pub id: NodeRef,
    /// Local name of the node.
    pub title: String,
    /// Target of the "Describe Axiom" action.
    pub describe_url: String,
    /// Mode the data was loaded under.
    pub mode: Mode,
    /// Rows in backend order.
    pub rows: Vec<RenderedRow>,
}

impl DetailsCard {
    /// Project `view` as loaded under `mode`.
    pub fn project(view: &DetailsView, mode: Mode) -> Self {
        Self {
            id: view.id.clone(),
            title: view.id.local_name().to_string(),
            describe_url: describe_axiom_url(&view.id, mode),
            mode,
            rows: view
                .properties
                .iter()
                .map(|row| RenderedRow {
                    label: row.label(),
                    value: row.value(),
                })
                .collect(),
        }
    }
}

/// Link to a SPARQL `DESCRIBE` of `id`.
///
/// The id goes into the query text as-is, so ids containing `>` or `&`
/// produce a malformed query.
pub fn describe_axiom_url(id: &NodeRef, mode: Mode) -> String {
    let inferred = if mode.is_inferred() { "&inferred=true" } else { "" };
    format!("/sparql/?run=true&query=DESCRIBE <{}>{}", id, inferred)
}

/// What the details panel displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailsPanel {
    /// Nothing selected.
    #[default]
    Empty,
    /// A load for `id` is pending.
    Loading {
        /// Node being loaded.
        id: NodeRef,
    },
    /// Properties of a node.
    Loaded(DetailsCard),
    /// The backend answered with an explicit error.
    ApplicationError {
        /// Node requested.
        id: NodeRef,
        /// Backend message, shown verbatim.
        message: String,
    },
    /// The request failed; a generic message is shown.
    Failed {
        /// Node requested.
        id: NodeRef,
    },
}

/// A details load that has been issued and not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsTicket {
    /// Tag checked on completion.
    pub generation: Generation,
    /// Node requested.
    pub id: NodeRef,
    /// Mode the request was issued for.
    pub mode: Mode,
}

/// What happened to a details load once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Properties were rendered.
    Rendered,
    /// The backend's error message was rendered.
    ApplicationError,
    /// The generic failure message was rendered.
    Failed,
    /// A newer load or a clear happened meanwhile; the response was dropped.
    Superseded,
}

/// Details panel plus in-flight load tracking.
#[derive(Debug, Clone, Default)]
pub struct DetailsState {
    panel: DetailsPanel,
    generation: GenerationCounter,
}

impl DetailsState {
    /// Empty panel, nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current panel content.
    pub fn panel(&self) -> &DetailsPanel {
        &self.panel
    }

    /// Register a load for `id` and show the loading placeholder.
    pub fn begin_load(&mut self, id: NodeRef, mode: Mode) -> DetailsTicket {
        let generation = self.generation.issue();
        debug!(generation = generation.value(), id = %id, mode = %mode, "Loading details");
        self.panel = DetailsPanel::Loading { id: id.clone() };
        DetailsTicket {
            generation,
            id,
            mode,
        }
    }

    /// Apply the response of a load.
    pub fn complete_load(
        &mut self,
        ticket: DetailsTicket,
        result: FetchResult<DetailsReply>,
    ) -> LoadOutcome {
        if !self.generation.is_current(ticket.generation) {
            warn!(
                generation = ticket.generation.value(),
                id = %ticket.id,
                "Discarding superseded details response"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(DetailsReply::View(view)) => {
                info!(
                    id = %view.id,
                    mode = %ticket.mode,
                    properties = view.properties.len(),
                    "Details rendered"
                );
                self.panel = DetailsPanel::Loaded(DetailsCard::project(&view, ticket.mode));
                LoadOutcome::Rendered
            }
            Ok(DetailsReply::Error { id, message }) => {
                info!(id = %id, message = %message, "Backend reported an error for node");
                self.panel = DetailsPanel::ApplicationError { id, message };
                LoadOutcome::ApplicationError
            }
            Err(e) => {
                error!(
                    id = %ticket.id,
                    mode = %ticket.mode,
                    kind = %e.kind(),
                    error = %e,
                    "Failed to load details"
                );
                self.panel = DetailsPanel::Failed { id: ticket.id };
                LoadOutcome::Failed
            }
        }
    }

    /// Back to the empty placeholder, dropping any load in flight.
    pub fn clear(&mut self) {
        self.generation.invalidate();
        self.panel = DetailsPanel::Empty;
    }
}
