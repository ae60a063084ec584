//! Graph Editor
//!
//! Turns user gestures into store calls and keeps the transient state the
//! store does not own: the linking mode and the current selection.
//!
//! Linking mode is an explicit state machine:
//!
//! - `Idle`: clicking a node selects it; starting a link enters `Linking`.
//! - `Linking`: clicking a different node tries to add the link. Success
//!   returns to `Idle`; a rejection keeps `Linking` and hands the error back.
//!   Clicking the source again does nothing. Cancel returns to `Idle`.
//!
//! Deleting the link source returns the editor to `Idle`.

use crate::config::{FragnetConfig, LinkDefaults};
use crate::error::{EditorError, GraphError};
use crate::layout::GridLayout;
use crate::store::GraphStore;
use crate::types::{
    ActivityKind, ActivityRecord, LinkId, LinkType, NodeData, NodeId, NodeUpdate, Position,
};
use crate::validator::{ValidationReport, Validator};

/// Linking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// No link is being drawn
    #[default]
    Idle,
    /// A link is being drawn from `source`
    Linking {
        /// Node the link starts at
        source: NodeId,
        /// Relationship type the link will get
        link_type: LinkType,
        /// Lag the link will get
        lag_days: i32,
    },
}

/// What is currently selected for inspection or editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// An activity node
    Node(NodeId),
    /// A precedence link
    Link(LinkId),
}

/// Result of clicking a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Idle click: the node is now selected
    Selected(NodeId),
    /// Linking click: the link was created and the editor is idle again
    Linked(LinkId),
    /// The click had no effect
    Ignored,
}

/// Interactive editing session over a graph store
#[derive(Debug, Clone)]
pub struct GraphEditor {
    store: GraphStore,
    mode: LinkMode,
    selection: Option<Selection>,
    layout: GridLayout,
    // grid slot for the next unpositioned placement; only moves forward
    next_slot: usize,
    link_defaults: LinkDefaults,
    new_activity_duration_days: u32,
}

impl GraphEditor {
    /// Create an editor over an empty store
    #[must_use]
    pub fn new(config: &FragnetConfig) -> Self {
        Self::with_store(GraphStore::new(), config)
    }

    /// Create an editor over an existing store
    #[must_use]
    pub fn with_store(store: GraphStore, config: &FragnetConfig) -> Self {
        Self {
            next_slot: store.node_count(),
            store,
            mode: LinkMode::Idle,
            selection: None,
            layout: GridLayout::new(config.layout),
            link_defaults: config.linking,
            new_activity_duration_days: config.new_activity_duration_days,
        }
    }

    /// Seed one unlinked node per activity, laid out on the grid
    #[must_use]
    pub fn from_activities(activities: &[ActivityRecord], config: &FragnetConfig) -> Self {
        let layout = GridLayout::new(config.layout);
        let mut store = GraphStore::new();
        for (index, activity) in activities.iter().enumerate() {
            store.add_node(activity.to_node_data(layout.slot(index)));
        }
        Self::with_store(store, config)
    }

    /// Read-only view of the graph
    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Give up the editor and keep the graph
    #[must_use]
    pub fn into_store(self) -> GraphStore {
        self.store
    }

    /// Current linking state
    #[must_use]
    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Current selection, if any
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Create a fresh activity
    ///
    /// Without an explicit position the node takes the next grid slot no
    /// live node sits on. Slots are never handed out twice, even after the
    /// node holding one is deleted.
    pub fn place_activity(
        &mut self,
        activity_id: impl Into<String>,
        description: impl Into<String>,
        kind: ActivityKind,
        position: Option<Position>,
    ) -> NodeId {
        let position = position.unwrap_or_else(|| self.take_free_slot());
        let data = NodeData::new(activity_id, description)
            .with_kind(kind)
            .with_duration(self.new_activity_duration_days)
            .at(position);
        self.store.add_node(data)
    }

    /// Handle a click on a node
    pub fn click_node(&mut self, id: NodeId) -> Result<ClickOutcome, EditorError> {
        match self.mode {
            LinkMode::Idle => {
                if !self.store.contains_node(id) {
                    return Err(GraphError::UnknownNode(id).into());
                }
                self.selection = Some(Selection::Node(id));
                Ok(ClickOutcome::Selected(id))
            }
            LinkMode::Linking { source, .. } if source == id => Ok(ClickOutcome::Ignored),
            LinkMode::Linking {
                source,
                link_type,
                lag_days,
            } => match self.store.add_link(source, id, link_type, lag_days) {
                Ok(link) => {
                    self.mode = LinkMode::Idle;
                    Ok(ClickOutcome::Linked(link))
                }
                Err(e) => {
                    tracing::warn!(%source, target = %id, error = %e, "link rejected");
                    Err(e.into())
                }
            },
        }
    }

    /// Enter linking mode from `source` with the configured defaults
    ///
    /// Starting again while already linking replaces the source.
    pub fn begin_linking(&mut self, source: NodeId) -> Result<(), EditorError> {
        if !self.store.contains_node(source) {
            return Err(GraphError::UnknownNode(source).into());
        }
        self.mode = LinkMode::Linking {
            source,
            link_type: self.link_defaults.link_type,
            lag_days: self.link_defaults.lag_days,
        };
        Ok(())
    }

    /// Change the relationship type of the link being drawn
    pub fn set_pending_link_type(&mut self, link_type: LinkType) -> Result<(), EditorError> {
        match &mut self.mode {
            LinkMode::Linking { link_type: pending, .. } => {
                *pending = link_type;
                Ok(())
            }
            LinkMode::Idle => Err(EditorError::NotLinking),
        }
    }

    /// Change the lag of the link being drawn
    pub fn set_pending_lag(&mut self, lag_days: i32) -> Result<(), EditorError> {
        match &mut self.mode {
            LinkMode::Linking { lag_days: pending, .. } => {
                *pending = lag_days;
                Ok(())
            }
            LinkMode::Idle => Err(EditorError::NotLinking),
        }
    }

    /// Leave linking mode without touching the graph
    pub fn cancel_linking(&mut self) {
        self.mode = LinkMode::Idle;
    }

    /// Move a node to where it was dropped
    pub fn drag_node(&mut self, id: NodeId, position: Position) -> Result<(), EditorError> {
        self.store.update_node_position(id, position)?;
        Ok(())
    }

    /// Select a link for inspection or deletion
    pub fn select_link(&mut self, id: LinkId) -> Result<(), EditorError> {
        if self.store.link(id).is_none() {
            return Err(GraphError::UnknownLink(id).into());
        }
        self.selection = Some(Selection::Link(id));
        Ok(())
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Delete a node and its links. Unknown ids are ignored.
    pub fn delete_node(&mut self, id: NodeId) {
        self.store.remove_node(id);
        if matches!(self.mode, LinkMode::Linking { source, .. } if source == id) {
            self.mode = LinkMode::Idle;
        }
        self.prune_selection();
    }

    /// Delete a link. Unknown ids are ignored.
    pub fn delete_link(&mut self, id: LinkId) {
        self.store.remove_link(id);
        self.prune_selection();
    }

    /// Delete whatever is selected
    pub fn delete_selected(&mut self) {
        match self.selection {
            Some(Selection::Node(id)) => self.delete_node(id),
            Some(Selection::Link(id)) => self.delete_link(id),
            None => {}
        }
    }

    /// Edit a node's descriptive fields
    pub fn edit_node(&mut self, id: NodeId, update: NodeUpdate) -> Result<(), EditorError> {
        self.store.update_node(id, update)?;
        Ok(())
    }

    /// Change a link's relationship type and lag
    pub fn edit_link(
        &mut self,
        id: LinkId,
        link_type: LinkType,
        lag_days: i32,
    ) -> Result<(), EditorError> {
        self.store.update_link(id, link_type, lag_days)?;
        Ok(())
    }

    /// Whether linking `from -> to` would close a cycle
    #[must_use]
    pub fn would_create_cycle(&self, from: NodeId, to: NodeId) -> bool {
        Validator::new().would_create_cycle(&self.store, from, to)
    }

    /// Run the blocking checks over the current graph
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        Validator::new().validate_store(&self.store)
    }

    fn take_free_slot(&mut self) -> Position {
        loop {
            let position = self.layout.slot(self.next_slot);
            self.next_slot += 1;
            if !self.store.nodes().any(|n| n.position == position) {
                return position;
            }
        }
    }

    fn prune_selection(&mut self) {
        let alive = match self.selection {
            Some(Selection::Node(id)) => self.store.contains_node(id),
            Some(Selection::Link(id)) => self.store.link(id).is_some(),
            None => true,
        };
        if !alive {
            self.selection = None;
        }
    }
}
