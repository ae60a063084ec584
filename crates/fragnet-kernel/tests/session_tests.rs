//! Fragnet session tests
//!
//! Seed, link, validate and save through the public API.

use fragnet_kernel::prelude::*;
use fragnet_test_utils::{assert_index_consistent, footing_activities, node_by_activity_id};
use pretty_assertions::assert_eq;

fn link(
    session: &mut FragnetSession,
    from: NodeId,
    to: NodeId,
    link_type: LinkType,
    lag: i32,
) -> LinkId {
    let editor = session.editor_mut();
    editor.begin_linking(from).unwrap();
    editor.set_pending_link_type(link_type).unwrap();
    editor.set_pending_lag(lag).unwrap();
    match editor.click_node(to).unwrap() {
        ClickOutcome::Linked(id) => id,
        other => panic!("expected a link, got {other:?}"),
    }
}

#[test]
fn footing_sequence_saves() {
    let mut session = FragnetSession::seed(&footing_activities(), &FragnetConfig::default());
    let store = session.editor().store();
    let a1 = node_by_activity_id(store, "A1");
    let a2 = node_by_activity_id(store, "A2");
    let a3 = node_by_activity_id(store, "A3");

    link(&mut session, a1, a2, LinkType::FinishToStart, 2);
    link(&mut session, a2, a3, LinkType::FinishToStart, 0);

    assert_eq!(session.validate().messages(), Vec::<String>::new());
    assert!(session.can_save());

    let export = session.save().unwrap();
    let links: Vec<_> = export
        .links
        .iter()
        .map(|l| (l.from, l.to, l.link_type, l.lag_days))
        .collect();
    assert_eq!(
        links,
        vec![
            (a1, a2, LinkType::FinishToStart, 2),
            (a2, a3, LinkType::FinishToStart, 0),
        ]
    );

    let durations: Vec<_> = export
        .nodes
        .iter()
        .map(|n| (n.activity_id.as_str(), n.duration_days))
        .collect();
    assert_eq!(durations, vec![("A1", 2), ("A2", 7), ("A3", 1)]);
    assert_eq!(export.nodes[1].predecessors, vec![a1]);
    assert_eq!(export.nodes[1].successors, vec![a3]);
}

#[test]
fn cycle_blocks_save_until_removed() {
    let mut session = FragnetSession::seed(&footing_activities(), &FragnetConfig::default());
    let store = session.editor().store();
    let a1 = node_by_activity_id(store, "A1");
    let a2 = node_by_activity_id(store, "A2");
    let a3 = node_by_activity_id(store, "A3");

    link(&mut session, a1, a2, LinkType::FinishToStart, 0);
    link(&mut session, a2, a3, LinkType::FinishToStart, 0);
    assert!(session.editor().would_create_cycle(a3, a1));
    let back = link(&mut session, a3, a1, LinkType::FinishToStart, 0);

    let report = session.validate();
    assert_eq!(report.findings.len(), 1);
    assert!(report.messages()[0].contains("Circular dependency detected involving"));
    assert!(matches!(session.save(), Err(SessionError::ValidationFailed(_))));

    // editing continues while invalid
    session.editor_mut().delete_link(back);
    let report = session.validate();
    assert!(!report.has_cycle());
    assert!(session.save().is_ok());
}

#[test]
fn orphans_reported_as_single_count() {
    let mut activities = footing_activities();
    activities.push(fragnet_test_utils::create_activity(
        "A4",
        "Backfill",
        fragnet_test_utils::date(2024, 6, 13),
        fragnet_test_utils::date(2024, 6, 14),
    ));
    activities.push(fragnet_test_utils::create_activity(
        "A5",
        "Inspect",
        fragnet_test_utils::date(2024, 6, 14),
        fragnet_test_utils::date(2024, 6, 14),
    ));
    let mut session = FragnetSession::seed(&activities, &FragnetConfig::default());
    let store = session.editor().store();
    let a1 = node_by_activity_id(store, "A1");
    let a2 = node_by_activity_id(store, "A2");
    let a3 = node_by_activity_id(store, "A3");

    link(&mut session, a1, a2, LinkType::FinishToStart, 0);
    link(&mut session, a2, a3, LinkType::FinishToStart, 0);

    assert_eq!(
        session.validate().messages(),
        vec!["2 orphaned activities found".to_string()]
    );
}

#[test]
fn resume_from_export_continues_editing() {
    let mut session = FragnetSession::seed(&footing_activities(), &FragnetConfig::default());
    let store = session.editor().store();
    let a1 = node_by_activity_id(store, "A1");
    let a2 = node_by_activity_id(store, "A2");
    let a3 = node_by_activity_id(store, "A3");
    link(&mut session, a1, a2, LinkType::FinishToStart, 2);
    link(&mut session, a2, a3, LinkType::StartToStart, 1);

    let json = session.save().unwrap().to_json_pretty().unwrap();
    let export = FragnetExport::from_json(&json).unwrap();

    let mut resumed = FragnetSession::resume(&export, &FragnetConfig::default()).unwrap();
    assert_index_consistent(resumed.editor().store());
    assert_eq!(resumed.save().unwrap(), export);

    resumed.editor_mut().delete_node(a2);
    assert_eq!(
        resumed.validate().messages(),
        vec!["2 orphaned activities found".to_string()]
    );
}

#[test]
fn seeded_layout_follows_config() {
    let config = FragnetConfig::default().with_columns(2);
    let session = FragnetSession::seed(&footing_activities(), &config);
    let layout = GridLayout::new(config.layout);

    let positions: Vec<_> = session.editor().store().nodes().map(|n| n.position).collect();
    assert_eq!(positions, vec![layout.slot(0), layout.slot(1), layout.slot(2)]);
    assert_eq!(positions[2].y, positions[0].y + config.layout.spacing_y);
}
