//! Testing utilities for the Fragnet workspace
//!
//! Shared fixtures and assertions.

#![allow(missing_docs)]

use chrono::NaiveDate;
use fragnet_kernel::store::GraphStore;
use fragnet_kernel::{ActivityKind, ActivityRecord, LinkType, NodeData, NodeId};
use std::collections::BTreeSet;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn create_activity(
    activity_id: &str,
    description: &str,
    start: NaiveDate,
    finish: NaiveDate,
) -> ActivityRecord {
    ActivityRecord {
        activity_id: activity_id.to_string(),
        description: description.to_string(),
        kind: ActivityKind::Task,
        start_date: start,
        finish_date: finish,
    }
}

/// Pour footing, Cure, Strip forms
pub fn footing_activities() -> Vec<ActivityRecord> {
    vec![
        create_activity("A1", "Pour footing", date(2024, 6, 3), date(2024, 6, 5)),
        create_activity("A2", "Cure", date(2024, 6, 5), date(2024, 6, 12)),
        create_activity("A3", "Strip forms", date(2024, 6, 12), date(2024, 6, 13)),
    ]
}

pub fn create_node(store: &mut GraphStore, name: &str) -> NodeId {
    store.add_node(NodeData::new(name, format!("Activity {name}")))
}

/// Nodes linked finish-to-start in sequence
pub fn create_chain(store: &mut GraphStore, names: &[&str]) -> Vec<NodeId> {
    let ids: Vec<NodeId> = names.iter().map(|n| create_node(store, n)).collect();
    for pair in ids.windows(2) {
        store.add_link(pair[0], pair[1], LinkType::FinishToStart, 0).unwrap();
    }
    ids
}

pub fn node_by_activity_id(store: &GraphStore, activity_id: &str) -> NodeId {
    store
        .nodes()
        .find(|n| n.activity_id == activity_id)
        .map(|n| n.id)
        .unwrap_or_else(|| panic!("no node with activity id {activity_id}"))
}

/// Every node's index sets equal the endpoints derived from the link list
pub fn assert_index_consistent(store: &GraphStore) {
    for node in store.nodes() {
        let successors: BTreeSet<NodeId> =
            store.links().filter(|l| l.from == node.id).map(|l| l.to).collect();
        let predecessors: BTreeSet<NodeId> =
            store.links().filter(|l| l.to == node.id).map(|l| l.from).collect();
        assert_eq!(node.successors(), &successors, "successors of {}", node.activity_id);
        assert_eq!(node.predecessors(), &predecessors, "predecessors of {}", node.activity_id);
    }
    for link in store.links() {
        assert_ne!(link.from, link.to, "self-loop {}", link.id);
        assert!(store.contains_node(link.from), "dangling from on {}", link.id);
        assert!(store.contains_node(link.to), "dangling to on {}", link.id);
    }
    assert_eq!(store.verify_index(), Ok(()));
}
