//! SQLite persistence for job and notebook records.
//!
//! Each operation opens its own connection, so a single `Db` can be shared
//! across threads without extra locking. Job times are stored as RFC 3339
//! text; notebook times are stored exactly as reported.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::PathBuf;

use crate::error::{Result, StatusError};
use crate::records::{JobRecord, SessionRecord};
use crate::store::{JobStore, SessionStore};
use crate::timestamp::{format_timestamp, parse_timestamp};

pub struct Db {
    path: PathBuf,
}

impl Db {
    pub fn new(path: PathBuf) -> Result<Self> {
        let db = Self { path };
        db.init_schema()?;
        Ok(db)
    }

    pub fn insert_job(&self, record: &JobRecord) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO jobs \
                    (id, status, accepted_time, created_time, running_time, finished_time) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.status,
                    record.accepted_time.as_ref().map(format_timestamp),
                    record.created_time.as_ref().map(format_timestamp),
                    record.running_time.as_ref().map(format_timestamp),
                    record.finished_time.as_ref().map(format_timestamp)
                ],
            )
            .map_err(|err| StatusError::store("Failed to insert job", err))?;
            Ok(())
        })
    }

    pub fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO sessions \
                    (id, name, status, created_time, deleted_time, reason, url) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.name,
                    record.status,
                    record.created_time,
                    record.deleted_time,
                    record.reason,
                    record.url
                ],
            )
            .map_err(|err| StatusError::store("Failed to insert session", err))?;
            Ok(())
        })
    }

    pub fn get_job(&self, id: &str) -> Result<Option<JobRecord>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, status, accepted_time, created_time, running_time, finished_time \
                 FROM jobs WHERE id = ?1",
                params![id],
                job_from_row,
            )
            .optional()
            .map_err(|err| StatusError::store("Failed to query job", err))
        })
    }

    pub fn get_session(&self, id: &str) -> Result<Option<SessionRecord>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, name, status, created_time, deleted_time, reason, url \
                 FROM sessions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SessionRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        status: row.get(2)?,
                        created_time: row.get(3)?,
                        deleted_time: row.get(4)?,
                        reason: row.get(5)?,
                        url: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(|err| StatusError::store("Failed to query session", err))
        })
    }

    pub fn update_job(&self, record: &JobRecord) -> Result<bool> {
        self.with_connection(|conn| {
            let changed = conn
                .execute(
                    "UPDATE jobs SET \
                        status = ?2, \
                        accepted_time = ?3, \
                        created_time = ?4, \
                        running_time = ?5, \
                        finished_time = ?6 \
                     WHERE id = ?1",
                    params![
                        record.id,
                        record.status,
                        record.accepted_time.as_ref().map(format_timestamp),
                        record.created_time.as_ref().map(format_timestamp),
                        record.running_time.as_ref().map(format_timestamp),
                        record.finished_time.as_ref().map(format_timestamp)
                    ],
                )
                .map_err(|err| StatusError::store("Failed to update job", err))?;
            Ok(changed > 0)
        })
    }

    pub fn update_session(&self, record: &SessionRecord) -> Result<bool> {
        self.with_connection(|conn| {
            let changed = conn
                .execute(
                    "UPDATE sessions SET \
                        name = ?2, \
                        status = ?3, \
                        created_time = ?4, \
                        deleted_time = ?5, \
                        reason = ?6, \
                        url = ?7 \
                     WHERE id = ?1",
                    params![
                        record.id,
                        record.name,
                        record.status,
                        record.created_time,
                        record.deleted_time,
                        record.reason,
                        record.url
                    ],
                )
                .map_err(|err| StatusError::store("Failed to update session", err))?;
            Ok(changed > 0)
        })
    }

    fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "BEGIN;
                 CREATE TABLE IF NOT EXISTS jobs (
                    id TEXT PRIMARY KEY,
                    status TEXT NOT NULL,
                    accepted_time TEXT,
                    created_time TEXT,
                    running_time TEXT,
                    finished_time TEXT
                 );
                 CREATE TABLE IF NOT EXISTS sessions (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    status TEXT,
                    created_time TEXT,
                    deleted_time TEXT,
                    reason TEXT,
                    url TEXT
                 );
                 COMMIT;",
            )
            .map_err(|err| StatusError::store("Failed to initialize schema", err))
        })
    }

    fn with_connection<T>(&self, op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.open()?;
        op(&mut conn)
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent).map_err(|source| StatusError::Io {
                context: "Failed to create data dir".to_string(),
                source,
            })?;
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|err| StatusError::store("Failed to open sqlite db", err))?;

        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|err| StatusError::store("Failed to set busy_timeout", err))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|err| StatusError::store("Failed to enable WAL", err))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|err| StatusError::store("Failed to set synchronous", err))?;

        Ok(conn)
    }
}

impl JobStore for Db {
    fn select(&self, id: &str) -> Result<Option<JobRecord>> {
        self.get_job(id)
    }

    fn update(&self, record: &JobRecord) -> Result<bool> {
        self.update_job(record)
    }
}

impl SessionStore for Db {
    fn select(&self, id: &str) -> Result<Option<SessionRecord>> {
        self.get_session(id)
    }

    fn update(&self, record: &SessionRecord) -> Result<bool> {
        self.update_session(record)
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get(0)?,
        status: row.get(1)?,
        accepted_time: stored_time(row, 2)?,
        created_time: stored_time(row, 3)?,
        running_time: stored_time(row, 4)?,
        finished_time: stored_time(row, 5)?,
    })
}

fn stored_time(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|value| {
        parse_timestamp(&value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
    })
    .transpose()
}
