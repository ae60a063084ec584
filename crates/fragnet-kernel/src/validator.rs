//! Fragnet Validator
//!
//! Read-only analysis of a store snapshot. Two checks block saving:
//!
//! 1. the network must be acyclic (first cycle found is reported)
//! 2. no activity may be orphaned (reported as a single count)
//!
//! Both are linear in nodes + links, so callers may run validation after
//! every edit. An invalid fragnet is a normal result, never an error.

use crate::store::{GraphSnapshot, GraphStore};
use crate::types::{ActivityNode, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// A single blocking problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationFinding {
    /// A cycle passes through `node`
    CircularDependency {
        /// Node found on the search stack
        node: NodeId,
        /// That node's description
        description: String,
    },
    /// `count` activities have no links at all
    OrphanedActivities {
        /// Number of unlinked activities
        count: usize,
    },
}

impl std::fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFinding::CircularDependency { description, .. } => {
                write!(f, "Circular dependency detected involving {description}")
            }
            ValidationFinding::OrphanedActivities { count } => {
                write!(f, "{count} orphaned activities found")
            }
        }
    }
}

/// Ordered validation findings. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Findings in check order: cycle first, then orphans
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// True when nothing blocks saving
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// Human-readable messages in report order
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }

    /// True when a cycle was found
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f, ValidationFinding::CircularDependency { .. }))
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.findings.is_empty() {
            return f.write_str("no problems found");
        }
        f.write_str(&self.messages().join("; "))
    }
}

#[derive(Clone, Copy)]
enum Mark {
    OnStack,
    Done,
}

/// Structural validator for fragnets
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a live store
    ///
    /// The store's index is trusted; a mismatch is a defect and trips a
    /// debug assertion.
    #[must_use]
    pub fn validate_store(&self, store: &GraphStore) -> ValidationReport {
        debug_assert!(
            store.verify_index().is_ok(),
            "adjacency index out of sync: {:?}",
            store.verify_index()
        );
        self.validate(&store.snapshot())
    }

    /// Run all blocking checks over a snapshot
    #[must_use]
    pub fn validate(&self, snapshot: &GraphSnapshot) -> ValidationReport {
        let mut findings = Vec::new();

        if let Some(node) = find_cycle(&snapshot.nodes) {
            findings.push(ValidationFinding::CircularDependency {
                node: node.id,
                description: node.description.clone(),
            });
        }

        let orphans = snapshot.nodes.iter().filter(|n| n.is_orphan()).count();
        if orphans > 0 {
            findings.push(ValidationFinding::OrphanedActivities { count: orphans });
        }

        if !findings.is_empty() {
            tracing::debug!(findings = findings.len(), "fragnet has validation findings");
        }
        ValidationReport { findings }
    }

    /// Activities with no predecessors
    #[must_use]
    pub fn entry_nodes(&self, snapshot: &GraphSnapshot) -> Vec<NodeId> {
        snapshot
            .nodes
            .iter()
            .filter(|n| n.predecessors().is_empty())
            .map(|n| n.id)
            .collect()
    }

    /// Activities with no successors
    #[must_use]
    pub fn exit_nodes(&self, snapshot: &GraphSnapshot) -> Vec<NodeId> {
        snapshot
            .nodes
            .iter()
            .filter(|n| n.successors().is_empty())
            .map(|n| n.id)
            .collect()
    }

    /// Activities in precedence order, or `None` if the network has a cycle
    ///
    /// Ties keep creation order.
    #[must_use]
    pub fn topological_order(&self, snapshot: &GraphSnapshot) -> Option<Vec<NodeId>> {
        let by_id: HashMap<NodeId, &ActivityNode> =
            snapshot.nodes.iter().map(|n| (n.id, n)).collect();
        let mut in_degree: HashMap<NodeId, usize> = snapshot
            .nodes
            .iter()
            .map(|n| (n.id, n.predecessors().len()))
            .collect();

        let mut ready: VecDeque<NodeId> = snapshot
            .nodes
            .iter()
            .filter(|n| n.predecessors().is_empty())
            .map(|n| n.id)
            .collect();
        let mut order = Vec::with_capacity(snapshot.nodes.len());

        while let Some(id) = ready.pop_front() {
            order.push(id);
            let Some(node) = by_id.get(&id) else { continue };
            for succ in node.successors() {
                if let Some(degree) = in_degree.get_mut(succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*succ);
                    }
                }
            }
        }

        (order.len() == snapshot.nodes.len()).then_some(order)
    }

    /// Whether adding `from -> to` would close a cycle
    ///
    /// Preview only; the store is not modified.
    #[must_use]
    pub fn would_create_cycle(&self, store: &GraphStore, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }

        // a cycle appears iff `from` is already reachable from `to`
        let mut visited = HashSet::new();
        let mut stack = vec![to];
        while let Some(id) = stack.pop() {
            if id == from {
                return true;
            }
            if visited.insert(id) {
                if let Some(node) = store.node(id) {
                    stack.extend(node.successors().iter().copied());
                }
            }
        }
        false
    }
}

/// Depth-first search with an on-stack marker, iterative to stay clear of
/// recursion limits on long chains. Returns the node the first back edge
/// lands on.
fn find_cycle(nodes: &[ActivityNode]) -> Option<&ActivityNode> {
    let by_id: HashMap<NodeId, &ActivityNode> = nodes.iter().map(|n| (n.id, n)).collect();
    let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(nodes.len());

    for root in nodes {
        if marks.contains_key(&root.id) {
            continue;
        }
        marks.insert(root.id, Mark::OnStack);
        let mut stack = vec![(root.id, root.successors().iter())];

        while let Some((current, successors)) = stack.last_mut() {
            match successors.next() {
                Some(next) => match marks.get(next) {
                    Some(Mark::OnStack) => return by_id.get(next).copied(),
                    Some(Mark::Done) => {}
                    None => {
                        let Some(&node) = by_id.get(next) else { continue };
                        marks.insert(*next, Mark::OnStack);
                        stack.push((*next, node.successors().iter()));
                    }
                },
                None => {
                    marks.insert(*current, Mark::Done);
                    stack.pop();
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LinkType, NodeData};

    fn chain(store: &mut GraphStore, names: &[&str]) -> Vec<NodeId> {
        let ids: Vec<_> = names
            .iter()
            .map(|n| store.add_node(NodeData::new(*n, format!("Activity {n}"))))
            .collect();
        for pair in ids.windows(2) {
            store.add_link(pair[0], pair[1], LinkType::FinishToStart, 0).unwrap();
        }
        ids
    }

    #[test]
    fn empty_graph_is_valid() {
        let report = Validator::new().validate_store(&GraphStore::new());
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn chain_is_valid() {
        let mut store = GraphStore::new();
        chain(&mut store, &["A", "B", "C"]);
        assert!(Validator::new().validate_store(&store).is_valid());
    }

    #[test]
    fn triangle_reports_one_cycle() {
        let mut store = GraphStore::new();
        let ids = chain(&mut store, &["A", "B", "C"]);
        store.add_link(ids[2], ids[0], LinkType::FinishToStart, 0).unwrap();

        let report = Validator::new().validate_store(&store);
        assert_eq!(report.findings.len(), 1);
        assert!(report.has_cycle());
        assert!(report.messages()[0]
            .starts_with("Circular dependency detected involving Activity"));
    }

    #[test]
    fn two_disjoint_cycles_still_one_report() {
        let mut store = GraphStore::new();
        let first = chain(&mut store, &["A", "B"]);
        let second = chain(&mut store, &["C", "D"]);
        store.add_link(first[1], first[0], LinkType::StartToStart, 0).unwrap();
        store.add_link(second[1], second[0], LinkType::StartToStart, 0).unwrap();

        let report = Validator::new().validate_store(&store);
        let cycles = report
            .findings
            .iter()
            .filter(|f| matches!(f, ValidationFinding::CircularDependency { .. }))
            .count();
        assert_eq!(cycles, 1);
    }

    #[test]
    fn orphans_counted_once() {
        let mut store = GraphStore::new();
        chain(&mut store, &["A", "B", "C"]);
        store.add_node(NodeData::new("D", "Loose 1"));
        store.add_node(NodeData::new("E", "Loose 2"));

        let report = Validator::new().validate_store(&store);
        assert_eq!(report.messages(), vec!["2 orphaned activities found".to_string()]);
    }

    #[test]
    fn cycle_precedes_orphans() {
        let mut store = GraphStore::new();
        let ids = chain(&mut store, &["A", "B"]);
        store.add_link(ids[1], ids[0], LinkType::FinishToFinish, 0).unwrap();
        store.add_node(NodeData::new("C", "Loose"));

        let messages = Validator::new().validate_store(&store).messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Circular dependency"));
        assert_eq!(messages[1], "1 orphaned activities found");
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut store = GraphStore::new();
        let names: Vec<String> = (0..20_000).map(|i| format!("N{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ids = chain(&mut store, &refs);
        assert!(Validator::new().validate_store(&store).is_valid());

        store.add_link(ids[ids.len() - 1], ids[0], LinkType::FinishToStart, 0).unwrap();
        assert!(Validator::new().validate_store(&store).has_cycle());
    }

    #[test]
    fn entry_exit_and_order() {
        let mut store = GraphStore::new();
        let ids = chain(&mut store, &["A", "B", "C"]);
        let d = store.add_node(NodeData::new("D", "Side"));
        store.add_link(ids[0], d, LinkType::StartToStart, 0).unwrap();

        let validator = Validator::new();
        let snapshot = store.snapshot();
        assert_eq!(validator.entry_nodes(&snapshot), vec![ids[0]]);
        assert_eq!(validator.exit_nodes(&snapshot), vec![ids[2], d]);

        let order = validator.topological_order(&snapshot).unwrap();
        let pos = |id| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(ids[0]) < pos(ids[1]));
        assert!(pos(ids[1]) < pos(ids[2]));
        assert!(pos(ids[0]) < pos(d));
    }

    #[test]
    fn topological_order_none_on_cycle() {
        let mut store = GraphStore::new();
        let ids = chain(&mut store, &["A", "B", "C"]);
        store.add_link(ids[2], ids[1], LinkType::FinishToStart, 0).unwrap();
        assert!(Validator::new().topological_order(&store.snapshot()).is_none());
    }

    #[test]
    fn would_create_cycle_preview() {
        let mut store = GraphStore::new();
        let ids = chain(&mut store, &["A", "B", "C"]);
        let validator = Validator::new();

        assert!(validator.would_create_cycle(&store, ids[2], ids[0]));
        assert!(!validator.would_create_cycle(&store, ids[0], ids[2]));
        assert!(validator.would_create_cycle(&store, ids[1], ids[1]));
        assert_eq!(store.link_count(), 2);
    }
}
