//! Expansion and selection state of the navigation tree, and the tree
//! loader's completion logic.

use std::collections::HashMap;

use tracing::{error, info, warn};

use super::{Generation, GenerationCounter, Mode, NodeRef, TreeFragment};
use crate::error::FetchResult;

/// Notice shown over the tree when a reload fails.
pub const TREE_FAILED_TEXT: &str = "Failed to load navigation tree.";

/// A reload that has been issued and not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    /// Tag checked on completion.
    pub generation: Generation,
    /// Mode the request was issued for.
    pub mode: Mode,
}

/// What happened to a reload once its response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The fragment was swapped in and node state reset.
    Applied,
    /// The request failed; the previous fragment stays displayed.
    Failed,
    /// A newer reload was issued meanwhile; the response was dropped.
    Superseded,
}

/// Tree fragment plus the node state layered over it.
///
/// Expansion entries exist only for nodes of the current fragment and are
/// dropped whenever the fragment is replaced. At most one node is active.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    fragment: Option<TreeFragment>,
    expansion: HashMap<NodeRef, bool>,
    selected: Option<NodeRef>,
    notice: Option<String>,
    generation: GenerationCounter,
}

impl TreeState {
    /// Empty state with no fragment displayed.
    pub fn new() -> Self {
        Self::default()
    }

    /// State displaying `fragment`, nothing expanded or selected.
    pub fn with_fragment(fragment: TreeFragment) -> Self {
        Self {
            fragment: Some(fragment),
            ..Self::default()
        }
    }

    /// Mark `id` active, clearing whichever node was active before.
    pub fn select_node(&mut self, id: NodeRef) {
        self.selected = Some(id);
    }

    /// The active node, if any.
    pub fn selected(&self) -> Option<&NodeRef> {
        self.selected.as_ref()
    }

    /// Whether `id` holds the active mark.
    pub fn is_active(&self, id: &NodeRef) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Flip the expansion of `id` and return the new value.
    ///
    /// Nodes that are not rendered or have no children stay collapsed.
    pub fn toggle_expansion(&mut self, id: &NodeRef) -> bool {
        let expandable = self
            .fragment
            .as_ref()
            .is_some_and(|fragment| fragment.has_children(id));
        if !expandable {
            return self.is_expanded(id);
        }

        let entry = self.expansion.entry(id.clone()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Whether `id` is expanded. Unknown nodes are collapsed.
    pub fn is_expanded(&self, id: &NodeRef) -> bool {
        self.expansion.get(id).copied().unwrap_or(false)
    }

    /// Raw expansion map.
    pub fn expansion(&self) -> &HashMap<NodeRef, bool> {
        &self.expansion
    }

    /// Nodes currently expanded, sorted.
    pub fn expanded_nodes(&self) -> Vec<NodeRef> {
        let mut nodes: Vec<NodeRef> = self
            .expansion
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(id, _)| id.clone())
            .collect();
        nodes.sort();
        nodes
    }

    /// Fragment currently displayed.
    pub fn fragment(&self) -> Option<&TreeFragment> {
        self.fragment.as_ref()
    }

    /// Error notice from the last failed reload, if no reload has
    /// succeeded since.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Register a new reload, superseding any still in flight.
    pub fn begin_reload(&mut self, mode: Mode) -> ReloadTicket {
        ReloadTicket {
            generation: self.generation.issue(),
            mode,
        }
    }

    /// Apply the response of a reload.
    pub fn complete_reload(
        &mut self,
        ticket: ReloadTicket,
        result: FetchResult<TreeFragment>,
    ) -> ReloadOutcome {
        if !self.generation.is_current(ticket.generation) {
            warn!(
                generation = ticket.generation.value(),
                mode = %ticket.mode,
                "Discarding superseded tree reload"
            );
            return ReloadOutcome::Superseded;
        }

        match result {
            Ok(fragment) => {
                info!(
                    generation = ticket.generation.value(),
                    mode = %ticket.mode,
                    nodes = fragment.nodes().len(),
                    "Tree fragment replaced"
                );
                self.fragment = Some(fragment);
                self.expansion.clear();
                self.selected = None;
                self.notice = None;
                ReloadOutcome::Applied
            }
            Err(e) => {
                error!(
                    generation = ticket.generation.value(),
                    mode = %ticket.mode,
                    kind = %e.kind(),
                    error = %e,
                    "Failed to reload navigation tree"
                );
                self.notice = Some(TREE_FAILED_TEXT.to_string());
                ReloadOutcome::Failed
            }
        }
    }

    /// Markup of the displayed fragment with node state applied.
    pub fn render(&self) -> Option<String> {
        self.fragment
            .as_ref()
            .map(|fragment| fragment.render(self.selected.as_ref(), |id| self.is_expanded(id)))
    }
}
