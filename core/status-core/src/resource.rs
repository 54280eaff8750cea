//! Resource type tags reported by the cluster controller.
//!
//! The set of tags is closed on our side but not on the controller's: a newly
//! added job engine may start reporting before it is wired in here. Those
//! tags parse as `Unknown` and reconcile to a no-op.

use serde::{Deserialize, Serialize};

use crate::error::RecordKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Notebook,
    TfJob,
    PyTorchJob,
    XgBoost,
    Unknown(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Notebook => "Notebook",
            ResourceKind::TfJob => "TFJob",
            ResourceKind::PyTorchJob => "PyTorchJob",
            ResourceKind::XgBoost => "XGBoost",
            ResourceKind::Unknown(tag) => tag,
        }
    }

    pub fn from_tag(value: &str) -> Self {
        match value {
            "Notebook" => ResourceKind::Notebook,
            "TFJob" => ResourceKind::TfJob,
            "PyTorchJob" => ResourceKind::PyTorchJob,
            "XGBoost" => ResourceKind::XgBoost,
            other => ResourceKind::Unknown(other.to_string()),
        }
    }

    /// The record family this resource is persisted as, if any.
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            ResourceKind::Notebook => Some(RecordKind::Session),
            ResourceKind::TfJob | ResourceKind::PyTorchJob | ResourceKind::XgBoost => {
                Some(RecordKind::Job)
            }
            ResourceKind::Unknown(_) => None,
        }
    }
}

impl From<String> for ResourceKind {
    fn from(value: String) -> Self {
        match ResourceKind::from_tag(&value) {
            ResourceKind::Unknown(_) => ResourceKind::Unknown(value),
            known => known,
        }
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
