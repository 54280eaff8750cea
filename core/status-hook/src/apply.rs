//! Applies one status report read from stdin.
//!
//! Input is a single JSON object:
//!
//! ```text
//! {"type": "TFJob", "id": "experiment-1", "fields": {"status": "Running"}}
//! ```
//!
//! Prints `true` or `false` (the store's write-back result) on success.

use std::io::{self, Read};
use std::sync::Arc;

use status_core::{Db, StatusReconciler, StatusReport};

use crate::error::HookError;

pub fn run(db: Arc<Db>) -> Result<bool, HookError> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(HookError::Stdin)?;

    let reconciler = StatusReconciler::new(db.clone(), db);
    apply_input(&reconciler, &input)
}

fn apply_input(reconciler: &StatusReconciler, input: &str) -> Result<bool, HookError> {
    if input.trim().is_empty() {
        tracing::debug!("Empty status report; nothing to apply");
        return Ok(false);
    }

    let report: StatusReport = serde_json::from_str(input).map_err(HookError::Parse)?;
    tracing::debug!(
        resource_type = %report.resource_type,
        resource_id = %report.resource_id,
        fields = report.fields.len(),
        "Applying status report"
    );

    Ok(reconciler.apply_report(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_core::{JobRecord, SessionRecord};

    fn setup() -> (tempfile::TempDir, Arc<Db>, StatusReconciler) {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db = Arc::new(Db::new(temp_dir.path().join("state.db")).expect("db init"));
        let reconciler = StatusReconciler::new(db.clone(), db.clone());
        (temp_dir, db, reconciler)
    }

    #[test]
    fn applies_job_report() {
        let (_temp_dir, db, reconciler) = setup();
        db.insert_job(&JobRecord::new("experiment-1", "Accepted"))
            .expect("insert job");

        let updated = apply_input(
            &reconciler,
            r#"{"type":"TFJob","id":"experiment-1","fields":{"status":"Running"}}"#,
        )
        .expect("apply");

        assert!(updated);
        let record = db
            .get_job("experiment-1")
            .expect("fetch job")
            .expect("job row");
        assert_eq!(record.status, "Running");
    }

    #[test]
    fn applies_notebook_report() {
        let (_temp_dir, db, reconciler) = setup();
        db.insert_session(&SessionRecord::new("notebook-1", "analysis"))
            .expect("insert session");

        let updated = apply_input(
            &reconciler,
            r#"{"type":"Notebook","id":"notebook-1","fields":{"reason":"Scheduled"}}"#,
        )
        .expect("apply");

        assert!(updated);
        let record = db
            .get_session("notebook-1")
            .expect("fetch session")
            .expect("session row");
        assert_eq!(record.reason.as_deref(), Some("Scheduled"));
    }

    #[test]
    fn empty_input_is_a_noop() {
        let (_temp_dir, _db, reconciler) = setup();
        assert!(!apply_input(&reconciler, "  \n").expect("apply"));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let (_temp_dir, _db, reconciler) = setup();
        let err = apply_input(&reconciler, "{not json").expect_err("parse error");
        assert_eq!(err.code(), "invalid_report");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn missing_record_surfaces_not_found() {
        let (_temp_dir, _db, reconciler) = setup();
        let err = apply_input(
            &reconciler,
            r#"{"type":"XGBoost","id":"experiment-9","fields":{}}"#,
        )
        .expect_err("not found");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn unknown_type_reports_false() {
        let (_temp_dir, _db, reconciler) = setup();
        let updated = apply_input(
            &reconciler,
            r#"{"type":"MPIJob","id":"experiment-1","fields":{"status":"Running"}}"#,
        )
        .expect("apply");
        assert!(!updated);
    }
}
