// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All reads and writes are serialized through tokio-rusqlite's single
//! background thread. Do NOT create additional Connection instances.

use std::path::Path;
use std::time::Duration;

use swapmatch_config::model::StorageConfig;
use swapmatch_core::SwapError;
use tracing::{debug, info};

use crate::migrations;

/// Handle to the swapmatch SQLite database.
///
/// Cloning is cheap: every clone talks to the same background connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    busy_timeout: Duration,
}

impl Database {
    /// Open (or create) the database described by `config`, apply PRAGMAs and
    /// run pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, SwapError> {
        let path = config.database_path.clone();
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SwapError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| SwapError::Storage {
                source: Box::new(e),
            })?;

        let wal_mode = config.wal_mode;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        conn.call(move |conn| -> Result<(), SwapError> {
            apply_pragmas(conn, wal_mode, busy_timeout)?;
            migrations::run_migrations(conn)
        })
        .await
        .map_err(flatten_call_err)?;

        info!(path = %path, wal_mode, "database opened");
        Ok(Self { conn, busy_timeout })
    }

    /// Open a private in-memory database with the full schema. Used by tests.
    pub async fn open_in_memory() -> Result<Self, SwapError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| SwapError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), SwapError> {
            apply_pragmas(conn, false, Duration::from_millis(0))?;
            migrations::run_migrations(conn)
        })
        .await
        .map_err(flatten_call_err)?;
        debug!("in-memory database opened");
        Ok(Self {
            conn,
            busy_timeout: Duration::ZERO,
        })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Report a lock wait that outlasted the busy timeout as `Timeout`.
    pub(crate) fn classify(&self, err: SwapError) -> SwapError {
        if let SwapError::Storage { source } = &err {
            if is_busy(source.as_ref()) {
                return SwapError::Timeout {
                    duration: self.busy_timeout,
                };
            }
        }
        err
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), SwapError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)
    }

    /// Close the connection, waiting for queued calls to finish.
    pub async fn close(self) -> Result<(), SwapError> {
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

fn apply_pragmas(
    conn: &rusqlite::Connection,
    wal_mode: bool,
    busy_timeout: Duration,
) -> Result<(), SwapError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(sql_err)?;
    if wal_mode {
        // journal_mode returns a row, so it cannot go through execute_batch.
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(sql_err)?;
        debug!(journal_mode = %mode, "journal mode set");
        conn.execute_batch("PRAGMA synchronous = NORMAL;")
            .map_err(sql_err)?;
    }
    if !busy_timeout.is_zero() {
        conn.busy_timeout(busy_timeout).map_err(sql_err)?;
    }
    Ok(())
}

/// Map a tokio-rusqlite error carrying a plain rusqlite error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SwapError {
    SwapError::Storage {
        source: Box::new(e),
    }
}

/// Unwrap a domain error raised inside a `call` closure; connection-level
/// failures become storage errors.
pub fn flatten_call_err(e: tokio_rusqlite::Error<SwapError>) -> SwapError {
    match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        other => SwapError::Storage {
            source: other.to_string().into(),
        },
    }
}

/// Map a rusqlite error raised by a query helper.
pub fn sql_err(e: rusqlite::Error) -> SwapError {
    SwapError::Storage {
        source: Box::new(e),
    }
}

/// True when `e` is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn is_busy(e: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    matches!(
        e.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::DatabaseBusy
    )
}
