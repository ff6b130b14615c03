// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction ledger queries.
//!
//! The `(user_id, product_id)` unique index is the single source of truth
//! for "at most one reaction per pair": a racing duplicate insert loses on
//! the index and is reported as a conflict naming the reaction that won.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{
    Interaction, InteractionId, InteractionKind, ProductId, ProductStats, SwapError, UserId,
};

use crate::database::{is_unique_violation, sql_err};
use crate::queries::{kind_column, positive_kinds_sql};

const COLUMNS: &str = "i.id, i.user_id, i.product_id, i.kind, i.message, i.created_at";

fn interaction_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: InteractionId(row.get(0)?),
        actor_id: UserId(row.get(1)?),
        product_id: ProductId(row.get(2)?),
        kind: kind_column(row, 3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// The actor's reaction to the product, if any.
pub fn find(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<Option<Interaction>, SwapError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM interactions i WHERE i.user_id = ?1 AND i.product_id = ?2"),
        params![actor.0, product.0],
        interaction_from_row,
    )
    .optional()
    .map_err(sql_err)
}

pub fn find_kind(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<Option<InteractionKind>, SwapError> {
    Ok(find(conn, actor, product)?.map(|i| i.kind))
}

pub fn get(conn: &Connection, id: InteractionId) -> Result<Option<Interaction>, SwapError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM interactions i WHERE i.id = ?1"),
        params![id.0],
        interaction_from_row,
    )
    .optional()
    .map_err(sql_err)
}

/// Record a reaction. Returns `Conflict` carrying the existing kind when the
/// actor already reacted to this product.
pub fn insert(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
    kind: InteractionKind,
    message: Option<&str>,
) -> Result<Interaction, SwapError> {
    let inserted = conn.query_row(
        "INSERT INTO interactions (user_id, product_id, kind, message)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, user_id, product_id, kind, message, created_at",
        params![actor.0, product.0, kind.as_str(), message],
        interaction_from_row,
    );
    match inserted {
        Ok(interaction) => Ok(interaction),
        Err(e) if is_unique_violation(&e) => {
            let existing = find_kind(conn, actor, product)?.unwrap_or(kind);
            Err(SwapError::Conflict { existing })
        }
        Err(e) => Err(sql_err(e)),
    }
}

/// Remove the actor's reaction and return it. Proposals cascade with it.
pub fn delete(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<Option<Interaction>, SwapError> {
    let Some(existing) = find(conn, actor, product)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM interactions WHERE id = ?1", params![existing.id.0])
        .map_err(sql_err)?;
    Ok(Some(existing))
}

/// Earliest positive reaction by `owner` to a live product owned by `actor`.
///
/// This is the reciprocity lookup: a hit means `owner` already showed
/// interest in something `actor` listed. Returns the interaction id and the
/// product it targets.
pub fn find_reciprocal(
    conn: &Connection,
    owner: UserId,
    actor: UserId,
) -> Result<Option<(InteractionId, ProductId)>, SwapError> {
    conn.query_row(
        &format!(
            "SELECT i.id, i.product_id
             FROM interactions i
             JOIN products p ON p.id = i.product_id
             WHERE i.user_id = ?1
               AND i.kind IN ({})
               AND p.owner_id = ?2
               AND p.deleted_at IS NULL
             ORDER BY i.id ASC
             LIMIT 1",
            positive_kinds_sql()
        ),
        params![owner.0, actor.0],
        |row| Ok((InteractionId(row.get(0)?), ProductId(row.get(1)?))),
    )
    .optional()
    .map_err(sql_err)
}

pub fn stats_for_product(conn: &Connection, product: ProductId) -> Result<ProductStats, SwapError> {
    let mut stmt = conn
        .prepare("SELECT kind, COUNT(*) FROM interactions WHERE product_id = ?1 GROUP BY kind")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![product.0], |row| {
            Ok((kind_column(row, 0)?, row.get::<_, i64>(1)?))
        })
        .map_err(sql_err)?;

    let mut stats = ProductStats::default();
    for row in rows {
        let (kind, count) = row.map_err(sql_err)?;
        let count = u64::try_from(count).unwrap_or(0);
        match kind {
            InteractionKind::Like => stats.likes = count,
            InteractionKind::Dislike => stats.dislikes = count,
            InteractionKind::Superlike => stats.superlikes = count,
        }
    }
    stats.total = stats.likes + stats.dislikes + stats.superlikes;
    Ok(stats)
}

/// Reactions of one kind made by `actor`, newest first.
pub fn list_by_actor(
    conn: &Connection,
    actor: UserId,
    kind: InteractionKind,
) -> Result<Vec<Interaction>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM interactions i
             WHERE i.user_id = ?1 AND i.kind = ?2
             ORDER BY i.id DESC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![actor.0, kind.as_str()], interaction_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Reactions of one kind that other users made on products `owner` lists,
/// newest first.
pub fn list_received(
    conn: &Connection,
    owner: UserId,
    kind: InteractionKind,
) -> Result<Vec<Interaction>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM interactions i
             JOIN products p ON p.id = i.product_id
             WHERE p.owner_id = ?1 AND i.kind = ?2 AND i.user_id <> ?1
             ORDER BY i.id DESC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![owner.0, kind.as_str()], interaction_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// `(product, other user)` for every product `actor` liked that someone
/// else liked too. Ordered by the actor's like, newest first, then by the
/// other user's like.
pub fn co_likers(conn: &Connection, actor: UserId) -> Result<Vec<(ProductId, UserId)>, SwapError> {
    let mut stmt = conn
        .prepare(
            "SELECT mine.product_id, other.user_id
             FROM interactions mine
             JOIN interactions other
               ON other.product_id = mine.product_id
              AND other.user_id <> mine.user_id
              AND other.kind = ?2
             WHERE mine.user_id = ?1 AND mine.kind = ?2
             ORDER BY mine.id DESC, other.id ASC",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![actor.0, InteractionKind::Like.as_str()], |row| {
            Ok((ProductId(row.get(0)?), UserId(row.get(1)?)))
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
