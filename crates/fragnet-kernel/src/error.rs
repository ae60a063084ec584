//! Error types for the fragnet engine
//!
//! Structural rejections come back from the store before anything is
//! mutated. Validation findings are not errors; they only surface here when
//! a save is blocked on them.

use crate::types::{LinkId, LinkType, NodeId};
use crate::validator::ValidationReport;

/// Top-level fragnet error
#[derive(Debug, thiserror::Error)]
pub enum FragnetError {
    /// Store rejection
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Editor rejection
    #[error("editor error: {0}")]
    Editor(#[from] EditorError),

    /// Configuration failure
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session lifecycle failure
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl FragnetError {
    /// Whether the caller can recover by choosing different input
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            FragnetError::Graph(_) | FragnetError::Editor(_) => true,
            FragnetError::Session(e) => matches!(e, SessionError::ValidationFailed(_)),
            FragnetError::Config(_) => false,
        }
    }
}

/// Structural rejection from the graph store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Link from an activity to itself
    #[error("a link cannot start and end at the same activity")]
    SelfLoop,

    /// No node with this id
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// No link with this id
    #[error("unknown link: {0}")]
    UnknownLink(LinkId),

    /// A link with the same endpoints and type exists
    #[error("a {link_type} link from {from} to {to} already exists")]
    DuplicateLink {
        /// Predecessor activity
        from: NodeId,
        /// Successor activity
        to: NodeId,
        /// Relationship type
        link_type: LinkType,
    },

    /// Node id imported twice
    #[error("node {0} appears more than once")]
    DuplicateNode(NodeId),

    /// Imported link with a missing endpoint
    #[error("link {0} references a node that does not exist")]
    DanglingLink(LinkId),
}

/// Errors raised by the interactive editor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// Pending link settings changed while idle
    #[error("no link is being drawn")]
    NotLinking,

    /// Store rejection
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl EditorError {
    /// The underlying store rejection, if any
    #[must_use]
    pub fn as_graph_error(&self) -> Option<&GraphError> {
        match self {
            EditorError::Graph(e) => Some(e),
            EditorError::NotLinking => None,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but cannot be used
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Save blocked by validation findings
    #[error("save blocked: {0}")]
    ValidationFailed(ValidationReport),

    /// Export could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Mismatch between the link list and the predecessor/successor index
///
/// Never a user-facing condition. The store maintains both sides in every
/// mutation, so observing one of these is a defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexViolation {
    /// Link endpoint missing from the arena
    #[error("link {link} references missing node {node}")]
    DanglingEndpoint {
        /// Offending link
        link: LinkId,
        /// Missing endpoint
        node: NodeId,
    },

    /// Successor set disagrees with the links
    #[error("successor index of {node} does not match its outgoing links")]
    Successors {
        /// Node with the stale set
        node: NodeId,
    },

    /// Predecessor set disagrees with the links
    #[error("predecessor index of {node} does not match its incoming links")]
    Predecessors {
        /// Node with the stale set
        node: NodeId,
    },

    /// Self-loop in the link list
    #[error("link {0} is a self-loop")]
    SelfLoop(LinkId),
}
