//! Fragnet editing session
//!
//! Seed from the schedule-update activities, edit, validate, and hand the
//! finished fragnet back on save. Saving is refused while validation reports
//! any finding; editing is never blocked.

use crate::config::FragnetConfig;
use crate::editor::GraphEditor;
use crate::error::{GraphError, SessionError};
use crate::export::FragnetExport;
use crate::store::GraphStore;
use crate::types::ActivityRecord;
use crate::validator::{ValidationReport, Validator};

/// One editing session over a fragnet
#[derive(Debug, Clone)]
pub struct FragnetSession {
    editor: GraphEditor,
}

impl FragnetSession {
    /// Seed one unlinked node per activity
    #[must_use]
    pub fn seed(activities: &[ActivityRecord], config: &FragnetConfig) -> Self {
        let editor = GraphEditor::from_activities(activities, config);
        tracing::info!(activities = activities.len(), "fragnet session seeded");
        Self { editor }
    }

    /// Continue editing a previously saved fragnet
    pub fn resume(export: &FragnetExport, config: &FragnetConfig) -> Result<Self, GraphError> {
        let store = GraphStore::from_export(export)?;
        tracing::info!(
            nodes = store.node_count(),
            links = store.link_count(),
            "fragnet session resumed"
        );
        Ok(Self {
            editor: GraphEditor::with_store(store, config),
        })
    }

    /// Read-only view of the editor
    #[must_use]
    pub fn editor(&self) -> &GraphEditor {
        &self.editor
    }

    /// Editor for applying gestures
    pub fn editor_mut(&mut self) -> &mut GraphEditor {
        &mut self.editor
    }

    /// Run the blocking checks without saving
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        Validator::new().validate_store(self.editor.store())
    }

    /// Whether `save` would succeed
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.validate().is_valid()
    }

    /// Validate and, if clean, produce the export
    pub fn save(&self) -> Result<FragnetExport, SessionError> {
        let report = self.validate();
        if !report.is_valid() {
            tracing::warn!(problems = report.findings.len(), "save blocked by validation");
            return Err(SessionError::ValidationFailed(report));
        }

        let export = FragnetExport::from_snapshot(&self.editor.store().snapshot());
        tracing::info!(
            nodes = export.nodes.len(),
            links = export.links.len(),
            "fragnet saved"
        );
        Ok(export)
    }

    /// Drop the session without any external effect
    pub fn discard(self) {
        tracing::info!(
            nodes = self.editor.store().node_count(),
            "fragnet session discarded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn activity(id: &str, description: &str, day: u32) -> ActivityRecord {
        ActivityRecord {
            activity_id: id.into(),
            description: description.into(),
            kind: crate::types::ActivityKind::Task,
            start_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            finish_date: NaiveDate::from_ymd_opt(2024, 5, day + 2).unwrap(),
        }
    }

    #[test]
    fn seed_creates_unlinked_grid_nodes() {
        let config = FragnetConfig::default();
        let session = FragnetSession::seed(
            &[activity("A1", "Pour footing", 1), activity("A2", "Cure", 4)],
            &config,
        );

        let nodes: Vec<_> = session.editor().store().nodes().cloned().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(session.editor().store().link_count(), 0);
        assert_eq!(nodes[0].duration_days, 2);
        assert_eq!(nodes[0].position, config.layout.origin);
        assert_ne!(nodes[0].position, nodes[1].position);
    }

    #[test]
    fn unlinked_seed_cannot_save() {
        let activities = [activity("A1", "Pour footing", 1)];
        let session = FragnetSession::seed(&activities, &FragnetConfig::default());
        assert!(!session.can_save());

        let err = session.save().unwrap_err();
        let SessionError::ValidationFailed(report) = err else {
            panic!("expected blocked save");
        };
        assert_eq!(report.messages(), vec!["1 orphaned activities found".to_string()]);
    }

    #[test]
    fn empty_session_saves_empty_export() {
        let session = FragnetSession::seed(&[], &FragnetConfig::default());
        let export = session.save().unwrap();
        assert!(export.nodes.is_empty());
        assert!(export.links.is_empty());
        session.discard();
    }
}
