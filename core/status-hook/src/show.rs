//! Prints a stored record as pretty JSON.

use status_core::{Db, RecordKind, ResourceKind, StatusError};

use crate::error::HookError;

pub fn run(db: &Db, resource_type: &str, resource_id: &str) -> Result<String, HookError> {
    let kind = ResourceKind::from_tag(resource_type);
    match kind.record_kind() {
        Some(RecordKind::Job) => {
            let record = db
                .get_job(resource_id)?
                .ok_or_else(|| StatusError::not_found(RecordKind::Job, resource_id))?;
            serde_json::to_string_pretty(&record).map_err(HookError::Encode)
        }
        Some(RecordKind::Session) => {
            let record = db
                .get_session(resource_id)?
                .ok_or_else(|| StatusError::not_found(RecordKind::Session, resource_id))?;
            serde_json::to_string_pretty(&record).map_err(HookError::Encode)
        }
        None => Err(HookError::UnknownType(resource_type.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_core::JobRecord;

    #[test]
    fn renders_job_with_wire_field_names() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db = Db::new(temp_dir.path().join("state.db")).expect("db init");
        db.insert_job(&JobRecord::new("experiment-1", "Running"))
            .expect("insert job");

        let output = run(&db, "PyTorchJob", "experiment-1").expect("show");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["id"], "experiment-1");
        assert_eq!(value["status"], "Running");
        assert!(value["runningTime"].is_null());
    }

    #[test]
    fn rejects_unknown_types_and_missing_records() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db = Db::new(temp_dir.path().join("state.db")).expect("db init");

        let err = run(&db, "MPIJob", "x").expect_err("unknown type");
        assert_eq!(err.code(), "unknown_type");

        let err = run(&db, "Notebook", "missing").expect_err("not found");
        assert_eq!(err.code(), "not_found");
    }
}
