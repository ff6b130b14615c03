// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat messages exchanged inside a match.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{MatchId, MessageId, MessageRecord, SwapError, UserId};

use crate::database::sql_err;

const COLUMNS: &str = "id, match_id, sender_id, content, created_at";

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRecord> {
    Ok(MessageRecord {
        id: MessageId(row.get(0)?),
        match_id: MatchId(row.get(1)?),
        sender_id: UserId(row.get(2)?),
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn insert_message(
    conn: &Connection,
    match_id: MatchId,
    sender: UserId,
    content: &str,
) -> Result<MessageRecord, SwapError> {
    conn.query_row(
        &format!(
            "INSERT INTO messages (match_id, sender_id, content) VALUES (?1, ?2, ?3)
             RETURNING {COLUMNS}"
        ),
        params![match_id.0, sender.0, content],
        message_from_row,
    )
    .map_err(sql_err)
}

/// Messages of a match in the order they were sent.
pub fn list_for_match(conn: &Connection, match_id: MatchId) -> Result<Vec<MessageRecord>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM messages WHERE match_id = ?1 ORDER BY id ASC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![match_id.0], message_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

pub fn latest_for_match(
    conn: &Connection,
    match_id: MatchId,
) -> Result<Option<MessageRecord>, SwapError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM messages WHERE match_id = ?1 ORDER BY id DESC LIMIT 1"),
        params![match_id.0],
        message_from_row,
    )
    .optional()
    .map_err(sql_err)
}
