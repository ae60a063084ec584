//! Fragnet export format
//!
//! The node and link lists handed to the scheduling collaborator on save,
//! serialized as camelCase JSON. An export can also be loaded back into a
//! store to resume editing.

use crate::error::GraphError;
use crate::store::{GraphSnapshot, GraphStore};
use crate::types::{ActivityKind, LinkId, LinkType, NodeData, NodeId, Position, PrecedenceLink};
use serde::{Deserialize, Serialize};

/// Exported activity node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedNode {
    /// Node identity
    pub id: NodeId,
    /// Display label from the schedule
    pub activity_id: String,
    /// Human-readable description
    pub description: String,
    /// Milestone or task
    pub kind: ActivityKind,
    /// Duration in whole days
    pub duration_days: u32,
    /// Nodes linked into this one
    pub predecessors: Vec<NodeId>,
    /// Nodes this one links into
    pub successors: Vec<NodeId>,
    /// Layout coordinate
    pub position: Position,
}

/// Exported precedence link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLink {
    /// Link identity
    pub id: LinkId,
    /// Predecessor activity
    pub from: NodeId,
    /// Successor activity
    pub to: NodeId,
    /// Relationship type
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Lag in days; negative values are leads
    pub lag_days: i32,
}

/// Immutable fragnet handed off on save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragnetExport {
    /// Nodes in creation order
    pub nodes: Vec<ExportedNode>,
    /// Links in creation order
    pub links: Vec<ExportedLink>,
}

impl FragnetExport {
    /// Capture a snapshot for hand-off
    #[must_use]
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let nodes = snapshot
            .nodes
            .iter()
            .map(|n| ExportedNode {
                id: n.id,
                activity_id: n.activity_id.clone(),
                description: n.description.clone(),
                kind: n.kind,
                duration_days: n.duration_days,
                predecessors: n.predecessors().iter().copied().collect(),
                successors: n.successors().iter().copied().collect(),
                position: n.position,
            })
            .collect();
        let links = snapshot
            .links
            .iter()
            .map(|l| ExportedLink {
                id: l.id,
                from: l.from,
                to: l.to,
                link_type: l.link_type,
                lag_days: l.lag_days,
            })
            .collect();
        Self { nodes, links }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse an export previously written by `to_json_pretty`
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

impl GraphStore {
    /// Rebuild a store from an export, keeping ids and positions
    ///
    /// The adjacency index is derived from the link list; the exported
    /// predecessor and successor lists are not trusted.
    pub fn from_export(export: &FragnetExport) -> Result<Self, GraphError> {
        let mut store = GraphStore::new();
        for node in &export.nodes {
            let data = NodeData::new(node.activity_id.clone(), node.description.clone())
                .with_kind(node.kind)
                .with_duration(node.duration_days)
                .at(node.position);
            store.insert_node_with_id(node.id, data)?;
        }
        for link in &export.links {
            store.insert_link_with_id(PrecedenceLink {
                id: link.id,
                from: link.from,
                to: link.to,
                link_type: link.link_type,
                lag_days: link.lag_days,
            })?;
        }
        tracing::debug!(
            nodes = store.node_count(),
            links = store.link_count(),
            "store restored from export"
        );
        Ok(store)
    }
}
