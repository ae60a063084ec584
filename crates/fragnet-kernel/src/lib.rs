//! Fragnet Kernel (fragnet-kernel)
//!
//! Builds and validates fragnets: small activity networks assembled before
//! they are merged into a master schedule.
//!
//! - **Store**: nodes, precedence links and the predecessor/successor index
//! - **Editor**: user gestures, linking mode and selection
//! - **Validator**: cycle and orphan checks that gate saving
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fragnet_kernel::prelude::*;
//!
//! let mut session = FragnetSession::seed(&activities, &FragnetConfig::default());
//! let editor = session.editor_mut();
//! editor.begin_linking(footing)?;
//! editor.click_node(cure)?;
//!
//! let export = session.save()?;
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod layout;
pub mod types;

// Graph engine
pub mod editor;
pub mod export;
pub mod session;
pub mod store;
pub mod validator;

// Re-exports
pub use error::*;
pub use types::*;

/// Re-export the common API for convenience
pub mod prelude {
    pub use crate::config::{FragnetConfig, LayoutConfig, LinkDefaults};
    pub use crate::editor::{ClickOutcome, GraphEditor, LinkMode, Selection};
    pub use crate::error::{ConfigError, EditorError, FragnetError, GraphError, SessionError};
    pub use crate::export::{ExportedLink, ExportedNode, FragnetExport};
    pub use crate::layout::GridLayout;
    pub use crate::session::FragnetSession;
    pub use crate::store::{GraphSnapshot, GraphStore};
    pub use crate::types::{
        ActivityKind, ActivityNode, ActivityRecord, LinkId, LinkType, NodeData, NodeId, NodeUpdate,
        Position, PrecedenceLink,
    };
    pub use crate::validator::{ValidationFinding, ValidationReport, Validator};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
