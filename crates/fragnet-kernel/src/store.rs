//! Graph Store
//!
//! Authoritative container for activity nodes and precedence links.
//! Nodes live in an arena keyed by id; each node carries predecessor and
//! successor id sets that index the link list. Every mutating method checks
//! its preconditions first and then updates the link list and both index
//! sides together, so no caller can observe one without the other.

use crate::error::{GraphError, IndexViolation};
use crate::types::{
    ActivityNode, LinkId, LinkType, NodeData, NodeId, NodeUpdate, Position, PrecedenceLink,
};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// Read-only copy of the store contents, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    /// Nodes with their predecessor/successor sets
    pub nodes: Vec<ActivityNode>,
    /// Every precedence link
    pub links: Vec<PrecedenceLink>,
}

/// Node and link container with a bidirectional adjacency index
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeId, ActivityNode>,
    links: IndexMap<LinkId, PrecedenceLink>,
    // (from, to, type) uniqueness index over `links`
    link_keys: HashMap<(NodeId, NodeId, LinkType), LinkId>,
}

impl GraphStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of links
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Check whether a node exists
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ActivityNode> {
        self.nodes.get(&id)
    }

    /// Get a link by id
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&PrecedenceLink> {
        self.links.get(&id)
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &ActivityNode> + '_ {
        self.nodes.values()
    }

    /// Links in creation order
    pub fn links(&self) -> impl Iterator<Item = &PrecedenceLink> + '_ {
        self.links.values()
    }

    /// Links from `from` to `to`, one per relationship type at most
    pub fn links_between(
        &self,
        from: NodeId,
        to: NodeId,
    ) -> impl Iterator<Item = &PrecedenceLink> + '_ {
        LinkType::ALL
            .into_iter()
            .filter_map(move |t| self.link_keys.get(&(from, to, t)))
            .filter_map(move |id| self.links.get(id))
    }

    /// Add a node. Always succeeds.
    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, ActivityNode::from_data(id, data));
        tracing::debug!(node = %id, "node added");
        id
    }

    /// Remove a node and every link touching it
    ///
    /// Unknown ids are ignored.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };

        let mut touching = Vec::new();
        for &succ in &node.successors {
            touching.extend(self.link_ids_between(id, succ));
        }
        for &pred in &node.predecessors {
            touching.extend(self.link_ids_between(pred, id));
        }

        for link_id in touching {
            self.remove_link(link_id);
        }
        self.nodes.shift_remove(&id);
        tracing::debug!(node = %id, "node removed");
    }

    /// Add a precedence link
    ///
    /// Rejects self-loops, unknown endpoints and duplicate
    /// `(from, to, type)` triples without mutating anything.
    pub fn add_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        link_type: LinkType,
        lag_days: i32,
    ) -> Result<LinkId, GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop);
        }
        if !self.nodes.contains_key(&from) {
            return Err(GraphError::UnknownNode(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(GraphError::UnknownNode(to));
        }
        if self.link_keys.contains_key(&(from, to, link_type)) {
            return Err(GraphError::DuplicateLink { from, to, link_type });
        }

        let id = LinkId::new();
        self.insert_link(PrecedenceLink {
            id,
            from,
            to,
            link_type,
            lag_days,
        });
        tracing::debug!(link = %id, %from, %to, %link_type, lag_days, "link added");
        Ok(id)
    }

    /// Remove a link. Unknown ids are ignored.
    pub fn remove_link(&mut self, id: LinkId) {
        let Some(link) = self.links.shift_remove(&id) else {
            return;
        };
        self.link_keys.remove(&(link.from, link.to, link.link_type));

        // another link type may still connect the same pair
        if self.link_ids_between(link.from, link.to).next().is_none() {
            if let Some(node) = self.nodes.get_mut(&link.from) {
                node.successors.remove(&link.to);
            }
            if let Some(node) = self.nodes.get_mut(&link.to) {
                node.predecessors.remove(&link.from);
            }
        }
        tracing::debug!(link = %id, "link removed");
    }

    /// Move a node. Never touches links.
    pub fn update_node_position(
        &mut self,
        id: NodeId,
        position: Position,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        node.position = position;
        Ok(())
    }

    /// Edit a node's descriptive fields
    pub fn update_node(&mut self, id: NodeId, update: NodeUpdate) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        if let Some(activity_id) = update.activity_id {
            node.activity_id = activity_id;
        }
        if let Some(description) = update.description {
            node.description = description;
        }
        if let Some(kind) = update.kind {
            node.kind = kind;
        }
        if let Some(days) = update.duration_days {
            node.duration_days = days;
        }
        tracing::debug!(node = %id, "node updated");
        Ok(())
    }

    /// Change a link's relationship type and lag
    ///
    /// Endpoints are immutable, so the adjacency index is unaffected.
    pub fn update_link(
        &mut self,
        id: LinkId,
        link_type: LinkType,
        lag_days: i32,
    ) -> Result<(), GraphError> {
        let link = self.links.get(&id).ok_or(GraphError::UnknownLink(id))?;
        let (from, to, old_type) = (link.from, link.to, link.link_type);

        if old_type != link_type {
            if self.link_keys.contains_key(&(from, to, link_type)) {
                return Err(GraphError::DuplicateLink { from, to, link_type });
            }
            self.link_keys.remove(&(from, to, old_type));
            self.link_keys.insert((from, to, link_type), id);
        }

        if let Some(link) = self.links.get_mut(&id) {
            link.link_type = link_type;
            link.lag_days = lag_days;
        }
        tracing::debug!(link = %id, %link_type, lag_days, "link updated");
        Ok(())
    }

    /// Copy out the current nodes and links
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            links: self.links.values().cloned().collect(),
        }
    }

    /// Check the adjacency index against the link list
    pub fn verify_index(&self) -> Result<(), IndexViolation> {
        let mut successors: HashMap<NodeId, BTreeSet<NodeId>> = HashMap::new();
        let mut predecessors: HashMap<NodeId, BTreeSet<NodeId>> = HashMap::new();

        for link in self.links.values() {
            if link.from == link.to {
                return Err(IndexViolation::SelfLoop(link.id));
            }
            for node in [link.from, link.to] {
                if !self.nodes.contains_key(&node) {
                    return Err(IndexViolation::DanglingEndpoint { link: link.id, node });
                }
            }
            successors.entry(link.from).or_default().insert(link.to);
            predecessors.entry(link.to).or_default().insert(link.from);
        }

        let empty = BTreeSet::new();
        for node in self.nodes.values() {
            if node.successors != *successors.get(&node.id).unwrap_or(&empty) {
                return Err(IndexViolation::Successors { node: node.id });
            }
            if node.predecessors != *predecessors.get(&node.id).unwrap_or(&empty) {
                return Err(IndexViolation::Predecessors { node: node.id });
            }
        }
        Ok(())
    }

    /// Insert a node under an existing id (import path)
    pub(crate) fn insert_node_with_id(
        &mut self,
        id: NodeId,
        data: NodeData,
    ) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, ActivityNode::from_data(id, data));
        Ok(())
    }

    /// Insert a link under an existing id (import path)
    pub(crate) fn insert_link_with_id(&mut self, link: PrecedenceLink) -> Result<(), GraphError> {
        if link.from == link.to {
            return Err(GraphError::SelfLoop);
        }
        if !self.nodes.contains_key(&link.from) || !self.nodes.contains_key(&link.to) {
            return Err(GraphError::DanglingLink(link.id));
        }
        if self.link_keys.contains_key(&(link.from, link.to, link.link_type)) {
            return Err(GraphError::DuplicateLink {
                from: link.from,
                to: link.to,
                link_type: link.link_type,
            });
        }
        self.insert_link(link);
        Ok(())
    }

    fn insert_link(&mut self, link: PrecedenceLink) {
        if let Some(node) = self.nodes.get_mut(&link.from) {
            node.successors.insert(link.to);
        }
        if let Some(node) = self.nodes.get_mut(&link.to) {
            node.predecessors.insert(link.from);
        }
        self.link_keys.insert((link.from, link.to, link.link_type), link.id);
        self.links.insert(link.id, link);
    }

    fn link_ids_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = LinkId> + '_ {
        LinkType::ALL
            .into_iter()
            .filter_map(move |t| self.link_keys.get(&(from, to, t)).copied())
    }
}
