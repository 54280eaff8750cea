//! Store boundary consumed by the reconciler.
//!
//! Stores look records up by id and persist full record state. The boolean
//! from `update` is the store's own success signal and is handed back to the
//! caller untouched; `Err` is reserved for the store failing to run at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, StatusError};
use crate::records::{JobRecord, SessionRecord};

pub trait JobStore: Send + Sync {
    fn select(&self, id: &str) -> Result<Option<JobRecord>>;

    fn update(&self, record: &JobRecord) -> Result<bool>;
}

pub trait SessionStore: Send + Sync {
    fn select(&self, id: &str) -> Result<Option<SessionRecord>>;

    fn update(&self, record: &SessionRecord) -> Result<bool>;
}

/// Process-local store, mostly for tests and embedding.
///
/// `update` only rewrites records that already exist and reports `false`
/// otherwise, mirroring an `UPDATE ... WHERE id = ?` that matched no row.
#[derive(Default)]
pub struct InMemoryStore {
    jobs: Mutex<HashMap<String, JobRecord>>,
    sessions: Mutex<HashMap<String, SessionRecord>>,
    updates: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, record: JobRecord) -> Result<()> {
        lock(&self.jobs)?.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn insert_session(&self, record: SessionRecord) -> Result<()> {
        lock(&self.sessions)?.insert(record.id.clone(), record);
        Ok(())
    }

    /// Number of `update` calls seen across both record kinds.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl JobStore for InMemoryStore {
    fn select(&self, id: &str) -> Result<Option<JobRecord>> {
        Ok(lock(&self.jobs)?.get(id).cloned())
    }

    fn update(&self, record: &JobRecord) -> Result<bool> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut jobs = lock(&self.jobs)?;
        match jobs.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl SessionStore for InMemoryStore {
    fn select(&self, id: &str) -> Result<Option<SessionRecord>> {
        Ok(lock(&self.sessions)?.get(id).cloned())
    }

    fn update(&self, record: &SessionRecord) -> Result<bool> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut sessions = lock(&self.sessions)?;
        match sessions.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|err| StatusError::store("In-memory store lock poisoned", err))
}
