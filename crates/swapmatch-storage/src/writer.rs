// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-writer transaction helpers.
//!
//! Every read and write goes through `tokio-rusqlite`'s single background
//! thread. Each engine operation is one closure on that thread, so no two
//! operations ever interleave inside the process. Writes additionally open
//! `BEGIN IMMEDIATE` so a second process sharing the file waits on the
//! write lock instead of failing mid-transaction.
//!
//! A lock wait that outlasts `busy_timeout` surfaces as
//! [`SwapError::Timeout`].
//!
//! **Do NOT create additional Connection instances for writes.**

use rusqlite::{Connection, Transaction, TransactionBehavior};
use swapmatch_core::SwapError;

use crate::database::{Database, flatten_call_err, sql_err};

/// Run `f` in an immediate transaction on an already borrowed connection.
///
/// Commits when `f` returns `Ok`; any error rolls the transaction back when
/// it is dropped.
pub fn immediate<R>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<R, SwapError>,
) -> Result<R, SwapError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(sql_err)?;
    let out = f(&tx)?;
    tx.commit().map_err(sql_err)?;
    Ok(out)
}

impl Database {
    /// Run `f` inside one immediate transaction on the writer thread.
    pub async fn write<F, R>(&self, f: F) -> Result<R, SwapError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<R, SwapError> + Send + 'static,
        R: Send + 'static,
    {
        self.connection()
            .call(move |conn| immediate(conn, f))
            .await
            .map_err(|e| self.classify(flatten_call_err(e)))
    }

    /// Run `f` against a consistent snapshot on the writer thread.
    pub async fn read<F, R>(&self, f: F) -> Result<R, SwapError>
    where
        F: FnOnce(&Connection) -> Result<R, SwapError> + Send + 'static,
        R: Send + 'static,
    {
        self.connection()
            .call(move |conn| -> Result<R, SwapError> {
                let tx = conn.transaction().map_err(sql_err)?;
                let out = f(&tx)?;
                tx.finish().map_err(sql_err)?;
                Ok(out)
            })
            .await
            .map_err(|e| self.classify(flatten_call_err(e)))
    }

    /// Hand the raw connection to `f`, for operations that commit more than
    /// one transaction back to back without yielding the writer thread.
    pub async fn exclusive<F, R>(&self, f: F) -> Result<R, SwapError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SwapError> + Send + 'static,
        R: Send + 'static,
    {
        self.connection()
            .call(f)
            .await
            .map_err(|e| self.classify(flatten_call_err(e)))
    }
}
