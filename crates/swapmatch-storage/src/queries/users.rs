// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User registration and lookup.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{Entity, NewUser, SwapError, UserId, UserSummary};

use crate::database::{is_unique_violation, sql_err};

/// Insert a user. A duplicate email is a validation failure.
pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<UserSummary, SwapError> {
    conn.execute(
        "INSERT INTO users (name, email, phone) VALUES (?1, ?2, ?3)",
        params![user.name, user.email, user.phone],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            SwapError::validation("email", "email already registered")
        } else {
            sql_err(e)
        }
    })?;
    Ok(UserSummary {
        id: UserId(conn.last_insert_rowid()),
        name: user.name.clone(),
        email: user.email.clone(),
    })
}

pub fn find_user(conn: &Connection, id: UserId) -> Result<Option<UserSummary>, SwapError> {
    conn.query_row(
        "SELECT id, name, email FROM users WHERE id = ?1",
        params![id.0],
        |row| {
            Ok(UserSummary {
                id: UserId(row.get(0)?),
                name: row.get(1)?,
                email: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(sql_err)
}

pub fn require_user(conn: &Connection, id: UserId) -> Result<UserSummary, SwapError> {
    find_user(conn, id)?.ok_or(SwapError::NotFound {
        entity: Entity::User,
        id: id.0,
    })
}
