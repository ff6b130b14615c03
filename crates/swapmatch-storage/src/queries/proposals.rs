// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counter-offer proposals attached to superlikes.

use rusqlite::{Connection, params};
use swapmatch_core::{InteractionId, ProductId, Proposal, ProposalId, SwapError, UserId};

use crate::database::sql_err;

const COLUMNS: &str =
    "id, interaction_id, user_id, offered_product_id, requested_product_id, created_at";

fn proposal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Proposal> {
    Ok(Proposal {
        id: ProposalId(row.get(0)?),
        interaction_id: InteractionId(row.get(1)?),
        actor_id: UserId(row.get(2)?),
        offered_product_id: ProductId(row.get(3)?),
        requested_product_id: ProductId(row.get(4)?),
        created_at: row.get(5)?,
    })
}

pub fn insert(
    conn: &Connection,
    interaction: InteractionId,
    actor: UserId,
    offered: ProductId,
    requested: ProductId,
) -> Result<Proposal, SwapError> {
    conn.query_row(
        &format!(
            "INSERT INTO proposals (interaction_id, user_id, offered_product_id, requested_product_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        ),
        params![interaction.0, actor.0, offered.0, requested.0],
        proposal_from_row,
    )
    .map_err(sql_err)
}

pub fn list_for_interaction(
    conn: &Connection,
    interaction: InteractionId,
) -> Result<Vec<Proposal>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM proposals WHERE interaction_id = ?1 ORDER BY id ASC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![interaction.0], proposal_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Proposals `actor` made for the requested product, newest first.
pub fn list_for_product(
    conn: &Connection,
    requested: ProductId,
    actor: UserId,
) -> Result<Vec<Proposal>, SwapError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE requested_product_id = ?1 AND user_id = ?2
             ORDER BY id DESC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![requested.0, actor.0], proposal_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
