//! Merges controller status reports into persisted records.
//!
//! ```text
//! Notebook                 → session merge
//! TFJob/PyTorchJob/XGBoost → job merge
//! anything else            → no-op, Ok(false)
//! ```
//!
//! Every merge is lookup, merge in memory, then a single write-back. There is
//! no locking around that read-modify-write: two reports for the same id that
//! race will both write, and the last one wins.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{RecordKind, Result, StatusError};
use crate::resource::ResourceKind;
use crate::store::{JobStore, SessionStore};
use crate::update::{JobUpdate, SessionUpdate, StatusReport};

pub struct StatusReconciler {
    jobs: Arc<dyn JobStore>,
    sessions: Arc<dyn SessionStore>,
}

impl StatusReconciler {
    pub fn new(jobs: Arc<dyn JobStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { jobs, sessions }
    }

    pub fn apply_report(&self, report: &StatusReport) -> Result<bool> {
        self.reconcile(&report.resource_type, &report.resource_id, &report.fields)
    }

    pub fn reconcile(
        &self,
        kind: &ResourceKind,
        resource_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<bool> {
        match kind.record_kind() {
            Some(RecordKind::Job) => self.merge_job(resource_id, &JobUpdate::from_fields(fields)),
            Some(RecordKind::Session) => {
                self.merge_session(resource_id, &SessionUpdate::from_fields(fields))
            }
            // Tolerated so a controller can report an engine we don't handle yet.
            None => {
                warn!(
                    resource_id = %resource_id,
                    kind = %kind,
                    "Ignoring status report for unrecognized resource type"
                );
                Ok(false)
            }
        }
    }

    pub fn merge_job(&self, resource_id: &str, update: &JobUpdate) -> Result<bool> {
        let mut record = self
            .jobs
            .select(resource_id)?
            .ok_or_else(|| StatusError::not_found(RecordKind::Job, resource_id))?;

        update.apply(&mut record)?;
        debug!(
            resource_id = %resource_id,
            status = %record.status,
            empty = update.is_empty(),
            "Merged job status report"
        );

        let written = self.jobs.update(&record)?;
        if !written {
            warn!(resource_id = %resource_id, "Job store rejected status write-back");
        }
        Ok(written)
    }

    pub fn merge_session(&self, resource_id: &str, update: &SessionUpdate) -> Result<bool> {
        let mut record = self
            .sessions
            .select(resource_id)?
            .ok_or_else(|| StatusError::not_found(RecordKind::Session, resource_id))?;

        update.apply(&mut record);
        debug!(
            resource_id = %resource_id,
            status = ?record.status,
            empty = update.is_empty(),
            "Merged notebook status report"
        );

        let written = self.sessions.update(&record)?;
        if !written {
            warn!(resource_id = %resource_id, "Session store rejected status write-back");
        }
        Ok(written)
    }
}
