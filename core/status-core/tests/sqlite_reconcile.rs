//! End-to-end reconciliation against the SQLite store.

use chrono::{TimeZone, Utc};
use serde_json::{json, Map, Value};
use status_core::{
    Db, JobRecord, ResourceKind, SessionRecord, StatusError, StatusReconciler, StatusReport,
};
use std::sync::Arc;
use std::thread;

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn setup() -> (tempfile::TempDir, Arc<Db>, StatusReconciler) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let db = Arc::new(Db::new(temp_dir.path().join("data").join("state.db")).expect("db init"));
    let reconciler = StatusReconciler::new(db.clone(), db.clone());
    (temp_dir, db, reconciler)
}

#[test]
fn test_job_lifecycle_reports_accumulate() {
    let (_temp_dir, db, reconciler) = setup();
    db.insert_job(&JobRecord::new("experiment-1", "Created"))
        .expect("insert job");

    let reports = [
        json!({ "status": "Accepted", "acceptedTime": "2024-05-01T10:00:00Z" }),
        json!({ "status": "Created", "createdTime": "2024-05-01T10:00:05Z" }),
        json!({ "status": "Running", "runningTime": "2024-05-01T10:00:30+00:00" }),
        json!({ "status": "Succeeded", "finishedTime": "2024-05-01T11:00:00Z" }),
    ];
    for report in reports {
        assert!(reconciler
            .reconcile(&ResourceKind::TfJob, "experiment-1", &fields(report))
            .expect("reconcile"));
    }

    let record = db
        .get_job("experiment-1")
        .expect("fetch job")
        .expect("job row");
    assert_eq!(record.status, "Succeeded");
    assert_eq!(
        record.accepted_time,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    );
    assert_eq!(
        record.created_time,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 5).unwrap())
    );
    assert_eq!(
        record.running_time,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 30).unwrap())
    );
    assert_eq!(
        record.finished_time,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())
    );
}

#[test]
fn test_malformed_timestamp_leaves_row_untouched() {
    let (_temp_dir, db, reconciler) = setup();
    db.insert_job(&JobRecord::new("experiment-1", "Accepted"))
        .expect("insert job");

    let err = reconciler
        .reconcile(
            &ResourceKind::XgBoost,
            "experiment-1",
            &fields(json!({ "status": "Running", "createdTime": "not-a-date" })),
        )
        .expect_err("malformed timestamp");

    assert_eq!(err.code(), "malformed_timestamp");
    let record = db
        .get_job("experiment-1")
        .expect("fetch job")
        .expect("job row");
    assert_eq!(record.status, "Accepted");
}

#[test]
fn test_notebook_report_updates_session_row() {
    let (_temp_dir, db, reconciler) = setup();
    let mut notebook = SessionRecord::new("notebook-1", "analysis");
    notebook.status = Some("creating".to_string());
    db.insert_session(&notebook).expect("insert session");

    let report: StatusReport = serde_json::from_value(json!({
        "type": "Notebook",
        "id": "notebook-1",
        "fields": {
            "status": "running",
            "createTime": "2024-05-01T10:00:00.000+08:00",
            "reason": "The notebook instance is running",
            "url": "/notebook/default/analysis/",
        },
    }))
    .expect("parse report");

    assert!(reconciler.apply_report(&report).expect("apply report"));

    let record = db
        .get_session("notebook-1")
        .expect("fetch session")
        .expect("session row");
    assert_eq!(record.name, "analysis");
    assert_eq!(record.status.as_deref(), Some("running"));
    assert_eq!(
        record.created_time.as_deref(),
        Some("2024-05-01T10:00:00.000+08:00")
    );
    assert_eq!(record.deleted_time, None);
    assert_eq!(record.url.as_deref(), Some("/notebook/default/analysis/"));
}

#[test]
fn test_missing_notebook_is_not_found() {
    let (_temp_dir, db, reconciler) = setup();
    db.insert_session(&SessionRecord::new("notebook-2", "analysis"))
        .expect("insert session");

    let err = reconciler
        .reconcile(&ResourceKind::Notebook, "notebook-1", &Map::new())
        .expect_err("not found");
    assert!(matches!(err, StatusError::NotFound { .. }));
    assert_eq!(err.to_string(), "cannot find notebook with id:notebook-1");
    assert!(db
        .get_session("notebook-1")
        .expect("fetch session")
        .is_none());
}

#[test]
fn test_unknown_resource_type_does_not_touch_db() {
    let (_temp_dir, db, reconciler) = setup();
    db.insert_job(&JobRecord::new("experiment-1", "Accepted"))
        .expect("insert job");

    let updated = reconciler
        .reconcile(
            &ResourceKind::from_tag("PaddleJob"),
            "experiment-1",
            &fields(json!({ "status": "Running" })),
        )
        .expect("reconcile");

    assert!(!updated);
    let record = db
        .get_job("experiment-1")
        .expect("fetch job")
        .expect("job row");
    assert_eq!(record.status, "Accepted");
}

#[test]
fn test_concurrent_reports_for_distinct_jobs() {
    let (_temp_dir, db, reconciler) = setup();
    let ids: Vec<String> = (0..8).map(|i| format!("experiment-{i}")).collect();
    for id in &ids {
        db.insert_job(&JobRecord::new(id.clone(), "Accepted"))
            .expect("insert job");
    }

    let reconciler = Arc::new(reconciler);
    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let reconciler = Arc::clone(&reconciler);
            thread::spawn(move || {
                reconciler
                    .reconcile(
                        &ResourceKind::PyTorchJob,
                        &id,
                        &fields(json!({ "status": format!("Running-{id}") })),
                    )
                    .expect("reconcile")
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("thread join"));
    }

    for id in &ids {
        let record = db.get_job(id).expect("fetch job").expect("job row");
        assert_eq!(record.status, format!("Running-{id}"));
    }
}
