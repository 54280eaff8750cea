//! Persisted records that status reports are merged into.
//!
//! Records are created elsewhere; this crate only reads and rewrites them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A training job run by one of the supported job engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub status: String,
    pub accepted_time: Option<DateTime<Utc>>,
    pub created_time: Option<DateTime<Utc>>,
    pub running_time: Option<DateTime<Utc>>,
    pub finished_time: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            accepted_time: None,
            created_time: None,
            running_time: None,
            finished_time: None,
        }
    }
}

/// An interactive notebook session.
///
/// Times are kept as the pre-formatted text the controller reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub created_time: Option<String>,
    pub deleted_time: Option<String>,
    pub reason: Option<String>,
    pub url: Option<String>,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: None,
            created_time: None,
            deleted_time: None,
            reason: None,
            url: None,
        }
    }
}
