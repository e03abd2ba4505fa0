//! The navigator: mode controller, tree loader and details loader over one
//! view state.
//!
//! All operations take `&self`. State lives in a `RefCell` that is borrowed
//! only between suspension points, so several operations may be pending on
//! one thread at once (joined futures, an event loop) and their completions
//! interleave freely. Each loader tags its requests with a generation and
//! drops responses that are no longer the latest.

use std::cell::RefCell;

use tracing::{debug, info};

use crate::backend::{GraphBackend, HttpBackend};
use crate::config::Config;
use crate::error::AppResult;
use crate::view::{
    render_details, DetailsPanel, DetailsState, GenerationCounter, LoadOutcome, Mode, NodeRef,
    ReloadOutcome, TreeFragment, TreeState,
};

#[derive(Debug)]
struct ViewState {
    mode: Mode,
    mode_changes: GenerationCounter,
    tree: TreeState,
    details: DetailsState,
}

/// Headless navigator session.
pub struct Navigator<B> {
    backend: B,
    state: RefCell<ViewState>,
}

impl Navigator<HttpBackend> {
    /// Navigator talking HTTP to the configured backend.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let backend = HttpBackend::new(&config.backend, config.request.clone())?;
        info!(
            base_url = %config.backend.base_url,
            mode = %config.navigator.default_mode,
            "Navigator initialized"
        );
        Ok(Self::new(backend, config.navigator.default_mode))
    }
}

impl<B: GraphBackend> Navigator<B> {
    /// Navigator with no tree displayed and an empty details panel.
    pub fn new(backend: B, mode: Mode) -> Self {
        Self {
            backend,
            state: RefCell::new(ViewState {
                mode,
                mode_changes: GenerationCounter::new(),
                tree: TreeState::new(),
                details: DetailsState::new(),
            }),
        }
    }

    /// Backend the navigator fetches through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    // ------------------------------------------------------------------
    // Mode controller
    // ------------------------------------------------------------------

    /// Switch mode, reload the tree for it, then clear the details panel.
    ///
    /// The mode changes before the reload is issued. If another mode change
    /// supersedes this one while the reload is pending, the panel is left to
    /// the newer change. A plain reload issued meanwhile only takes over the
    /// tree.
    pub async fn set_mode(&self, mode: Mode) {
        let change = {
            let mut state = self.state.borrow_mut();
            info!(from = %state.mode, to = %mode, "Mode changed");
            state.mode = mode;
            state.mode_changes.issue()
        };

        let outcome = self.reload(mode).await;
        let latest = self.state.borrow().mode_changes.is_current(change);
        if latest {
            self.clear_details();
        } else {
            debug!(?outcome, "Mode change superseded, details left to the newer one");
        }
    }

    /// Switch to the other mode.
    pub async fn toggle_mode(&self) {
        let next = self.mode().toggled();
        self.set_mode(next).await;
    }

    // ------------------------------------------------------------------
    // Tree loader
    // ------------------------------------------------------------------

    /// Fetch the tree for `mode` and swap it in.
    ///
    /// On success expansion and selection are reset. On failure the previous
    /// tree stays and a notice is set.
    pub async fn reload(&self, mode: Mode) -> ReloadOutcome {
        let ticket = self.state.borrow_mut().tree.begin_reload(mode);
        debug!(generation = ticket.generation.value(), mode = %mode, "Reloading tree");

        let result = self.backend.fetch_navigation(mode).await;
        self.state.borrow_mut().tree.complete_reload(ticket, result)
    }

    // ------------------------------------------------------------------
    // Expansion / selection
    // ------------------------------------------------------------------

    /// Make `id` the active node and load its details.
    pub async fn select_node(&self, id: NodeRef) -> LoadOutcome {
        let mode = {
            let mut state = self.state.borrow_mut();
            state.tree.select_node(id.clone());
            state.mode
        };
        self.load(id, mode).await
    }

    /// Flip the expansion of `id`; returns the new value.
    pub fn toggle_expansion(&self, id: &NodeRef) -> bool {
        self.state.borrow_mut().tree.toggle_expansion(id)
    }

    /// A click on a tree node header: select it, flip its expansion and
    /// load its details.
    pub async fn click_node(&self, id: NodeRef) -> LoadOutcome {
        let mode = {
            let mut state = self.state.borrow_mut();
            state.tree.select_node(id.clone());
            let expanded = state.tree.toggle_expansion(&id);
            debug!(id = %id, expanded, "Tree node clicked");
            state.mode
        };
        self.load(id, mode).await
    }

    /// The active node, if any.
    pub fn selected(&self) -> Option<NodeRef> {
        self.state.borrow().tree.selected().cloned()
    }

    /// Whether `id` is expanded.
    pub fn is_expanded(&self, id: &NodeRef) -> bool {
        self.state.borrow().tree.is_expanded(id)
    }

    /// Nodes currently expanded, sorted.
    pub fn expanded_nodes(&self) -> Vec<NodeRef> {
        self.state.borrow().tree.expanded_nodes()
    }

    /// Fragment currently displayed.
    pub fn tree_fragment(&self) -> Option<TreeFragment> {
        self.state.borrow().tree.fragment().cloned()
    }

    /// Notice from the last failed reload.
    pub fn tree_notice(&self) -> Option<String> {
        self.state.borrow().tree.notice().map(str::to_string)
    }

    /// Tree markup with selection and expansion applied.
    pub fn render_tree(&self) -> Option<String> {
        self.state.borrow().tree.render()
    }

    // ------------------------------------------------------------------
    // Details loader
    // ------------------------------------------------------------------

    /// Fetch the properties of `id` under `mode` into the details panel.
    pub async fn load(&self, id: NodeRef, mode: Mode) -> LoadOutcome {
        let ticket = self.state.borrow_mut().details.begin_load(id, mode);
        let result = self.backend.fetch_details(&ticket.id, mode).await;
        self.state.borrow_mut().details.complete_load(ticket, result)
    }

    /// A click on a cross-reference in the details panel.
    ///
    /// Loads `id` under the current mode. Tree selection and expansion are
    /// left alone.
    pub async fn follow_reference(&self, id: NodeRef) -> LoadOutcome {
        let mode = self.mode();
        debug!(id = %id, "Following cross-reference");
        self.load(id, mode).await
    }

    /// Reset the details panel to its placeholder, dropping any load in
    /// flight.
    pub fn clear_details(&self) {
        self.state.borrow_mut().details.clear();
    }

    /// Current details panel.
    pub fn details_panel(&self) -> DetailsPanel {
        self.state.borrow().details.panel().clone()
    }

    /// Details panel markup.
    pub fn render_details(&self) -> String {
        render_details(self.state.borrow().details.panel())
    }
}
