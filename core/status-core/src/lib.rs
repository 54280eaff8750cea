//! # status-core
//!
//! Status synchronization for cluster-managed resources. A controller reports
//! that a notebook or training job changed state; we find the persisted
//! record and merge the reported fields into it.
//!
//! ## Design Principles
//!
//! - **Synchronous**: Two store calls per report, no async runtime dependency.
//! - **Stateless reconciler**: All state lives in the stores it is handed.
//! - **Partial updates**: Fields that were not reported are left untouched.
//! - **Forward compatible**: Unrecognized resource types are a no-op, not an error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use status_core::{Db, ResourceKind, StatusReconciler};
//!
//! let db = Arc::new(Db::new(path)?);
//! let reconciler = StatusReconciler::new(db.clone(), db);
//! let updated = reconciler.reconcile(&ResourceKind::TfJob, "experiment-1", &fields)?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod reconciler;
pub mod records;
pub mod resource;
pub mod store;
pub mod timestamp;
pub mod update;

pub use config::{load_config, StatusConfig};
pub use db::Db;
pub use error::{RecordKind, Result, StatusError};
pub use reconciler::StatusReconciler;
pub use records::{JobRecord, SessionRecord};
pub use resource::ResourceKind;
pub use store::{InMemoryStore, JobStore, SessionStore};
pub use update::{JobUpdate, SessionUpdate, StatusReport};
