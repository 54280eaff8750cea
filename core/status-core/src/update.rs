//! Typed status updates and the field-level merge policy for each record kind.
//!
//! Controllers report an untyped JSON object. We lift it into an explicit
//! update struct per record kind so "key absent" and "key present with null"
//! are distinct where the merge policy cares about the difference.
//!
//! ## Field policy
//!
//! ```text
//! job      status, acceptedTime, createdTime,   skip when absent or null
//!          runningTime, finishedTime           times parsed before any write
//! session  status                              applied when the key is present,
//!                                              null clears the stored status
//!          createTime, deletedTime, name,      skip when absent or null,
//!          reason, url                         stored as raw text
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StatusError};
use crate::records::{JobRecord, SessionRecord};
use crate::resource::ResourceKind;
use crate::timestamp::parse_timestamp;

pub const FIELD_STATUS: &str = "status";
pub const FIELD_ACCEPTED_TIME: &str = "acceptedTime";
pub const FIELD_CREATED_TIME: &str = "createdTime";
pub const FIELD_RUNNING_TIME: &str = "runningTime";
pub const FIELD_FINISHED_TIME: &str = "finishedTime";

// Notebook controllers report "createTime", not "createdTime".
pub const FIELD_CREATE_TIME: &str = "createTime";
pub const FIELD_DELETED_TIME: &str = "deletedTime";
pub const FIELD_NAME: &str = "name";
pub const FIELD_REASON: &str = "reason";
pub const FIELD_URL: &str = "url";

/// One report from the controller, as read off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "type")]
    pub resource_type: ResourceKind,
    #[serde(rename = "id")]
    pub resource_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobUpdate {
    pub status: Option<String>,
    pub accepted_time: Option<String>,
    pub created_time: Option<String>,
    pub running_time: Option<String>,
    pub finished_time: Option<String>,
}

impl JobUpdate {
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            status: rendered(fields, FIELD_STATUS),
            accepted_time: rendered(fields, FIELD_ACCEPTED_TIME),
            created_time: rendered(fields, FIELD_CREATED_TIME),
            running_time: rendered(fields, FIELD_RUNNING_TIME),
            finished_time: rendered(fields, FIELD_FINISHED_TIME),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &JobUpdate::default()
    }

    /// Merge into `record`. Every timestamp is parsed before the record is
    /// touched, so a malformed value leaves it exactly as it was.
    pub fn apply(&self, record: &mut JobRecord) -> Result<()> {
        let accepted_time = parse_field(FIELD_ACCEPTED_TIME, &self.accepted_time)?;
        let created_time = parse_field(FIELD_CREATED_TIME, &self.created_time)?;
        let running_time = parse_field(FIELD_RUNNING_TIME, &self.running_time)?;
        let finished_time = parse_field(FIELD_FINISHED_TIME, &self.finished_time)?;

        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if accepted_time.is_some() {
            record.accepted_time = accepted_time;
        }
        if created_time.is_some() {
            record.created_time = created_time;
        }
        if running_time.is_some() {
            record.running_time = running_time;
        }
        if finished_time.is_some() {
            record.finished_time = finished_time;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// `Some(None)` when the key was reported with a null value.
    pub status: Option<Option<String>>,
    pub create_time: Option<String>,
    pub deleted_time: Option<String>,
    pub name: Option<String>,
    pub reason: Option<String>,
    pub url: Option<String>,
}

impl SessionUpdate {
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            status: fields.get(FIELD_STATUS).map(render_scalar),
            create_time: rendered(fields, FIELD_CREATE_TIME),
            deleted_time: rendered(fields, FIELD_DELETED_TIME),
            name: rendered(fields, FIELD_NAME),
            reason: rendered(fields, FIELD_REASON),
            url: rendered(fields, FIELD_URL),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &SessionUpdate::default()
    }

    pub fn apply(&self, record: &mut SessionRecord) {
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if let Some(create_time) = &self.create_time {
            record.created_time = Some(create_time.clone());
        }
        if let Some(deleted_time) = &self.deleted_time {
            record.deleted_time = Some(deleted_time.clone());
        }
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(reason) = &self.reason {
            record.reason = Some(reason.clone());
        }
        if let Some(url) = &self.url {
            record.url = Some(url.clone());
        }
    }
}

/// Textual form of a reported value; `None` for null.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn rendered(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(render_scalar)
}

fn parse_field(field: &'static str, value: &Option<String>) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(text) => parse_timestamp(text)
            .map(Some)
            .map_err(|source| StatusError::MalformedTimestamp {
                field,
                value: text.clone(),
                source,
            }),
        None => Ok(None),
    }
}
