// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match detector.
//!
//! Given a fresh positive reaction of `actor` to `product`, looks for the
//! reverse interest (the product's owner having liked or superliked any
//! live product `actor` owns) and materializes at most one match per
//! unordered user pair.

use rusqlite::Connection;
use swapmatch_core::{MatchDetails, PairKey, ProductId, SwapError, UserId};
use swapmatch_storage::queries::{interactions, matches, products};
use tracing::{debug, info, warn};

use crate::store;

/// Create the match completed by `actor` reacting to `product`, if any.
///
/// Returns `None` when there is no reciprocal interest, when the pair is
/// already matched, or when the product belongs to `actor`.
pub fn check_and_create_match(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<Option<MatchDetails>, SwapError> {
    let owner = products::require_product_including_deleted(conn, product)?.owner_id;
    if owner == actor {
        return Ok(None);
    }

    let Some((reciprocal, product1)) = interactions::find_reciprocal(conn, owner, actor)? else {
        debug!(actor = %actor, owner = %owner, "no reciprocal interest");
        return Ok(None);
    };

    let pair = PairKey::new(actor, owner);
    if matches::find_by_pair(conn, pair)?.is_some() {
        debug!(low = %pair.low, high = %pair.high, "pair already matched");
        return Ok(None);
    }

    let Some(record) = matches::insert(conn, pair, product1, product)? else {
        warn!(
            low = %pair.low,
            high = %pair.high,
            "match insert lost to an existing match for the pair"
        );
        return Ok(None);
    };

    info!(
        match_id = %record.id,
        low = %pair.low,
        high = %pair.high,
        product1 = %product1,
        product2 = %product,
        reciprocal = %reciprocal,
        "match created"
    );
    store::details(conn, &record).map(Some)
}
