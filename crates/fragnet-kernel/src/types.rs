//! Core types for the fragnet engine
//!
//! Identifiers, activity nodes, precedence links and the activity records
//! the engine is seeded from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique activity node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generate new node ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique precedence link identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Generate new link ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of schedule activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Zero or short duration marker. Not enforced.
    Milestone,
    /// Work with a duration
    #[default]
    Task,
}

/// Precedence relationship type
///
/// Stored as metadata only. Cycle detection treats every link as a plain
/// `from -> to` edge regardless of its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LinkType {
    /// Successor starts after the predecessor finishes (`FS`)
    #[default]
    #[serde(alias = "FS")]
    FinishToStart,
    /// Successor starts after the predecessor starts (`SS`)
    #[serde(alias = "SS")]
    StartToStart,
    /// Successor finishes after the predecessor finishes (`FF`)
    #[serde(alias = "FF")]
    FinishToFinish,
    /// Successor finishes after the predecessor starts (`SF`)
    #[serde(alias = "SF")]
    StartToFinish,
}

impl LinkType {
    /// All four relationship types
    pub const ALL: [LinkType; 4] = [
        LinkType::FinishToStart,
        LinkType::StartToStart,
        LinkType::FinishToFinish,
        LinkType::StartToFinish,
    ];

    /// Short scheduling code (`FS`, `SS`, `FF`, `SF`)
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            LinkType::FinishToStart => "FS",
            LinkType::StartToStart => "SS",
            LinkType::FinishToFinish => "FF",
            LinkType::StartToFinish => "SF",
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Layout coordinate. Has no meaning to validation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An activity node held by the graph store
///
/// The predecessor and successor sets are an index over the store's link
/// list. Only the store writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityNode {
    /// Store-assigned identity
    pub id: NodeId,
    /// Display label from the schedule; not required to be unique
    pub activity_id: String,
    /// Human-readable description
    pub description: String,
    /// Milestone or task
    pub kind: ActivityKind,
    /// Duration in whole days
    pub duration_days: u32,
    /// Planned start, if the node was seeded from a record
    pub start_date: Option<NaiveDate>,
    /// Planned finish, if the node was seeded from a record
    pub finish_date: Option<NaiveDate>,
    pub(crate) predecessors: BTreeSet<NodeId>,
    pub(crate) successors: BTreeSet<NodeId>,
    /// Layout coordinate
    pub position: Position,
}

impl ActivityNode {
    pub(crate) fn from_data(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            activity_id: data.activity_id,
            description: data.description,
            kind: data.kind,
            duration_days: data.duration_days,
            start_date: data.start_date,
            finish_date: data.finish_date,
            predecessors: BTreeSet::new(),
            successors: BTreeSet::new(),
            position: data.position,
        }
    }

    /// Nodes linked into this one
    #[must_use]
    pub fn predecessors(&self) -> &BTreeSet<NodeId> {
        &self.predecessors
    }

    /// Nodes this one links into
    #[must_use]
    pub fn successors(&self) -> &BTreeSet<NodeId> {
        &self.successors
    }

    /// True when the node has neither predecessors nor successors
    #[must_use]
    pub fn is_orphan(&self) -> bool {
        self.predecessors.is_empty() && self.successors.is_empty()
    }
}

/// A directed precedence link between two activities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecedenceLink {
    /// Store-assigned identity
    pub id: LinkId,
    /// Predecessor activity
    pub from: NodeId,
    /// Successor activity
    pub to: NodeId,
    /// Relationship type
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Negative values are leads.
    pub lag_days: i32,
}

/// Data for a node about to be added to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Display label from the schedule; not required to be unique
    pub activity_id: String,
    /// Human-readable description
    pub description: String,
    /// Milestone or task
    pub kind: ActivityKind,
    /// Duration in whole days
    pub duration_days: u32,
    /// Planned start, if the node was seeded from a record
    pub start_date: Option<NaiveDate>,
    /// Planned finish, if the node was seeded from a record
    pub finish_date: Option<NaiveDate>,
    /// Layout coordinate
    pub position: Position,
}

impl NodeData {
    /// A task with zero duration at the origin
    #[must_use]
    pub fn new(activity_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            description: description.into(),
            kind: ActivityKind::Task,
            duration_days: 0,
            start_date: None,
            finish_date: None,
            position: Position::default(),
        }
    }

    /// With activity kind
    #[must_use]
    pub fn with_kind(mut self, kind: ActivityKind) -> Self {
        self.kind = kind;
        self
    }

    /// With duration in days
    #[must_use]
    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    /// At a layout position
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Partial edit of a node's descriptive fields
///
/// Duration is independent of the start/finish dates once the node exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    /// New display label
    pub activity_id: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New activity kind
    pub kind: Option<ActivityKind>,
    /// New duration in days
    pub duration_days: Option<u32>,
}

impl NodeUpdate {
    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the display label
    #[must_use]
    pub fn activity_id(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    /// Set the activity kind
    #[must_use]
    pub fn kind(mut self, kind: ActivityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the duration
    #[must_use]
    pub fn duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }
}

/// An activity supplied by the schedule-update collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Display label from the schedule; not required to be unique
    pub activity_id: String,
    /// Human-readable description
    pub description: String,
    /// Milestone or task
    #[serde(default)]
    pub kind: ActivityKind,
    /// Planned start
    pub start_date: NaiveDate,
    /// Planned finish
    pub finish_date: NaiveDate,
}

impl ActivityRecord {
    /// Whole days from start to finish, clamped at zero
    #[must_use]
    pub fn duration_days(&self) -> u32 {
        let days = (self.finish_date - self.start_date).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Node data for this record placed at `position`
    #[must_use]
    pub fn to_node_data(&self, position: Position) -> NodeData {
        NodeData {
            activity_id: self.activity_id.clone(),
            description: self.description.clone(),
            kind: self.kind,
            duration_days: self.duration_days(),
            start_date: Some(self.start_date),
            finish_date: Some(self.finish_date),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: (i32, u32, u32), finish: (i32, u32, u32)) -> ActivityRecord {
        ActivityRecord {
            activity_id: "A1".into(),
            description: "Pour footing".into(),
            kind: ActivityKind::Task,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            finish_date: NaiveDate::from_ymd_opt(finish.0, finish.1, finish.2).unwrap(),
        }
    }

    #[test]
    fn duration_is_finish_minus_start() {
        assert_eq!(record((2024, 3, 1), (2024, 3, 11)).duration_days(), 10);
        assert_eq!(record((2024, 2, 28), (2024, 3, 1)).duration_days(), 2);
    }

    #[test]
    fn inverted_dates_clamp_to_zero() {
        assert_eq!(record((2024, 3, 11), (2024, 3, 1)).duration_days(), 0);
    }

    #[test]
    fn link_type_accepts_short_codes() {
        let parsed: LinkType = serde_json::from_str("\"SS\"").unwrap();
        assert_eq!(parsed, LinkType::StartToStart);
        let parsed: LinkType = serde_json::from_str("\"FinishToFinish\"").unwrap();
        assert_eq!(parsed, LinkType::FinishToFinish);
        assert_eq!(LinkType::StartToFinish.to_string(), "SF");
    }

    #[test]
    fn record_kind_defaults_to_task() {
        let json = r#"{
            "activityId": "M1",
            "description": "NTP",
            "startDate": "2024-01-02",
            "finishDate": "2024-01-02"
        }"#;
        let parsed: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, ActivityKind::Task);
        assert_eq!(parsed.duration_days(), 0);
    }
}
