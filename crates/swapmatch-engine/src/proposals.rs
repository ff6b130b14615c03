// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proposal ledger: the counter-offer bundled with a superlike.
//!
//! Proposals are immutable. One is only ever written in the same transaction
//! as the superlike interaction it hangs off.

use rusqlite::Connection;
use swapmatch_config::MatchingConfig;
use swapmatch_core::{
    Entity, InteractionId, ProductId, ProductSummary, Proposal, ProposalDetails, SwapError, UserId,
};
use swapmatch_storage::queries::{products, proposals};

/// Check the product offered in exchange for `requested`.
pub fn validate_offer(
    conn: &Connection,
    rules: &MatchingConfig,
    actor: UserId,
    requested: ProductId,
    offered: ProductId,
) -> Result<ProductSummary, SwapError> {
    if offered == requested {
        return Err(SwapError::validation(
            "offered_product_id",
            "cannot offer a product in exchange for itself",
        ));
    }
    let product = products::require_product(conn, offered, Entity::OfferedProduct)?;
    if rules.require_offer_ownership && product.owner_id != actor {
        return Err(SwapError::validation(
            "offered_product_id",
            "the offered product must belong to you",
        ));
    }
    Ok(product)
}

pub fn create_proposal(
    conn: &Connection,
    interaction: InteractionId,
    actor: UserId,
    offered: ProductId,
    requested: ProductId,
) -> Result<ProposalDetails, SwapError> {
    let row = proposals::insert(conn, interaction, actor, offered, requested)?;
    details(conn, row)
}

/// Proposals `actor` made for `product`, newest first.
pub fn list_for_product(
    conn: &Connection,
    product: ProductId,
    actor: UserId,
) -> Result<Vec<ProposalDetails>, SwapError> {
    proposals::list_for_product(conn, product, actor)?
        .into_iter()
        .map(|row| details(conn, row))
        .collect()
}

pub(crate) fn details(conn: &Connection, row: Proposal) -> Result<ProposalDetails, SwapError> {
    let offered_product = products::require_product_including_deleted(conn, row.offered_product_id)?;
    Ok(ProposalDetails {
        id: row.id,
        offered_product,
        requested_product_id: row.requested_product_id,
        created_at: row.created_at,
    })
}
