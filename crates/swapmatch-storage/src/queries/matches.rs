// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match store queries.
//!
//! Pairs are stored normalized (`user_low < user_high`) under a unique index,
//! so a second insert for the same unordered pair always loses.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{MatchId, MatchRecord, PairKey, ProductId, SwapError, UserId};

use crate::database::{is_unique_violation, sql_err};

const COLUMNS: &str = "id, user_low, user_high, product1_id, product2_id, created_at";

fn match_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: MatchId(row.get(0)?),
        pair: PairKey {
            low: UserId(row.get(1)?),
            high: UserId(row.get(2)?),
        },
        product1_id: ProductId(row.get(3)?),
        product2_id: ProductId(row.get(4)?),
        created_at: row.get(5)?,
    })
}

pub fn find_by_pair(conn: &Connection, pair: PairKey) -> Result<Option<MatchRecord>, SwapError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM matches WHERE user_low = ?1 AND user_high = ?2"),
        params![pair.low.0, pair.high.0],
        match_from_row,
    )
    .optional()
    .map_err(sql_err)
}

/// Insert a match for `pair`. Returns `None` if the pair already has one.
pub fn insert(
    conn: &Connection,
    pair: PairKey,
    product1: ProductId,
    product2: ProductId,
) -> Result<Option<MatchRecord>, SwapError> {
    let inserted = conn.query_row(
        &format!(
            "INSERT INTO matches (user_low, user_high, product1_id, product2_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        ),
        params![pair.low.0, pair.high.0, product1.0, product2.0],
        match_from_row,
    );
    match inserted {
        Ok(record) => Ok(Some(record)),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(sql_err(e)),
    }
}

pub fn get(conn: &Connection, id: MatchId) -> Result<Option<MatchRecord>, SwapError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM matches WHERE id = ?1"),
        params![id.0],
        match_from_row,
    )
    .optional()
    .map_err(sql_err)
}

/// Every match `user` participates in, newest first.
pub fn list_for_user(conn: &Connection, user: UserId) -> Result<Vec<MatchRecord>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM matches
             WHERE user_low = ?1 OR user_high = ?1
             ORDER BY created_at DESC, id DESC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![user.0], match_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
