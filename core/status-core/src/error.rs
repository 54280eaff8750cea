//! Error types for status reconciliation.
//!
//! Callers get enough context back (record kind and id, or the offending
//! field) to log the failure and pick their own retry policy. Nothing in this
//! crate retries.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which persisted record family a resource maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Job,
    Session,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Job => "job",
            RecordKind::Session => "session",
        }
    }

    /// Name operators know the record by, used in messages.
    pub fn entity_name(&self) -> &'static str {
        match self {
            RecordKind::Job => "experiment",
            RecordKind::Session => "notebook",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors that can occur while reconciling a status report.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    // ─────────────────────────────────────────────────────────────────────
    // Reconciliation Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("cannot find {} with id:{id}", .kind.entity_name())]
    NotFound { kind: RecordKind, id: String },

    #[error("Malformed timestamp in field {field}: {value:?}: {source}")]
    MalformedTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Store error: {context}: {details}")]
    Store { context: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StatusError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        StatusError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn store(context: impl Into<String>, details: impl ToString) -> Self {
        StatusError::Store {
            context: context.into(),
            details: details.to_string(),
        }
    }

    /// HTTP-style classification attached to the failure.
    pub fn http_status(&self) -> u16 {
        match self {
            StatusError::NotFound { .. } => 404,
            StatusError::MalformedTimestamp { .. } => 400,
            StatusError::Store { .. }
            | StatusError::ConfigMalformed { .. }
            | StatusError::Io { .. } => 500,
        }
    }

    /// Stable machine-readable code for logs and exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            StatusError::NotFound { .. } => "not_found",
            StatusError::MalformedTimestamp { .. } => "malformed_timestamp",
            StatusError::Store { .. } => "store_error",
            StatusError::ConfigMalformed { .. } => "config_malformed",
            StatusError::Io { .. } => "io_error",
        }
    }
}

/// Convenience type alias for Results using StatusError.
pub type Result<T> = std::result::Result<T, StatusError>;
