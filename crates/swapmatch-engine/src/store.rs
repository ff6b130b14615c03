// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match store, query side.
//!
//! Matches are immutable once created. Everything here resolves stored rows
//! into participant-relative views.

use rusqlite::Connection;
use swapmatch_core::{
    Entity, LastMessage, MatchDetails, MatchId, MatchListing, MatchRecord, SwapError, UserId,
};
use swapmatch_storage::queries::{matches, messages, products, users};

/// Resolve both participants and both products of a stored match.
pub fn details(conn: &Connection, record: &MatchRecord) -> Result<MatchDetails, SwapError> {
    Ok(MatchDetails {
        id: record.id,
        pair: record.pair,
        user_low: users::require_user(conn, record.pair.low)?,
        user_high: users::require_user(conn, record.pair.high)?,
        product1: products::require_product_including_deleted(conn, record.product1_id)?,
        product2: products::require_product_including_deleted(conn, record.product2_id)?,
        created_at: record.created_at.clone(),
    })
}

/// The match, provided `user` is one of its participants. Anyone else gets
/// `NotFound`, exactly as if the match did not exist.
pub fn get_match(conn: &Connection, user: UserId, id: MatchId) -> Result<MatchRecord, SwapError> {
    matches::get(conn, id)?
        .filter(|record| record.pair.contains(user))
        .ok_or(SwapError::NotFound {
            entity: Entity::Match,
            id: id.0,
        })
}

/// Newest message of the match, if any, flagged relative to `viewer`.
pub fn latest_message(
    conn: &Connection,
    viewer: UserId,
    id: MatchId,
) -> Result<Option<LastMessage>, SwapError> {
    Ok(messages::latest_for_match(conn, id)?.map(|message| LastMessage {
        id: message.id,
        content: message.content,
        created_at: message.created_at,
        from_you: message.sender_id == viewer,
    }))
}

/// Build the view of `record` seen by `viewer`.
pub fn listing(
    conn: &Connection,
    viewer: UserId,
    record: &MatchRecord,
) -> Result<MatchListing, SwapError> {
    let other = record.pair.other(viewer).ok_or(SwapError::NotFound {
        entity: Entity::Match,
        id: record.id.0,
    })?;
    let product1 = products::require_product_including_deleted(conn, record.product1_id)?;
    let product2 = products::require_product_including_deleted(conn, record.product2_id)?;
    let (your_product, their_product) = if product1.owner_id == viewer {
        (product1, product2)
    } else {
        (product2, product1)
    };
    Ok(MatchListing {
        id: record.id,
        other_user: users::require_user(conn, other)?,
        your_product,
        their_product,
        created_at: record.created_at.clone(),
        last_message: latest_message(conn, viewer, record.id)?,
    })
}

/// All matches of `user`, newest first.
pub fn list_matches(conn: &Connection, user: UserId) -> Result<Vec<MatchListing>, SwapError> {
    users::require_user(conn, user)?;
    matches::list_for_user(conn, user)?
        .iter()
        .map(|record| listing(conn, user, record))
        .collect()
}
