// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Users, products and categories: the collaborators the ledger reads from.

use rusqlite::Connection;
use rust_decimal::Decimal;
use swapmatch_config::{MatchingConfig, ProductDeletion};
use swapmatch_core::{
    Category, Entity, NewProduct, NewUser, ProductId, ProductSummary, SwapError, UserId,
    UserSummary,
};
use swapmatch_storage::queries::{categories, products, users};
use tracing::{debug, info};

pub fn register_user(conn: &Connection, user: &NewUser) -> Result<UserSummary, SwapError> {
    if user.name.trim().is_empty() {
        return Err(SwapError::validation("name", "must not be empty"));
    }
    if !user.email.contains('@') {
        return Err(SwapError::validation("email", "not an email address"));
    }
    let created = users::insert_user(conn, user)?;
    info!(user = %created.id, "user registered");
    Ok(created)
}

pub fn create_product(conn: &Connection, product: &NewProduct) -> Result<ProductSummary, SwapError> {
    if product.name.trim().is_empty() {
        return Err(SwapError::validation("name", "must not be empty"));
    }
    if product.price <= Decimal::ZERO {
        return Err(SwapError::validation("price", "must be greater than zero"));
    }
    users::require_user(conn, product.owner_id)?;
    categories::find_category(conn, product.category_id)?.ok_or(SwapError::NotFound {
        entity: Entity::Category,
        id: product.category_id.0,
    })?;
    let created = products::insert_product(conn, product)?;
    info!(product = %created.id, owner = %created.owner_id, "product listed");
    Ok(created)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, SwapError> {
    categories::list_categories(conn)
}

/// Delete `product` on behalf of `owner`, following the configured policy.
///
/// Someone else's product reads as `NotFound`.
pub fn delete_product(
    conn: &Connection,
    rules: &MatchingConfig,
    owner: UserId,
    product: ProductId,
) -> Result<(), SwapError> {
    let existing = products::require_product(conn, product, Entity::Product)?;
    if existing.owner_id != owner {
        return Err(SwapError::NotFound {
            entity: Entity::Product,
            id: product.0,
        });
    }
    match rules.product_deletion {
        ProductDeletion::Soft => {
            products::soft_delete(conn, product)?;
        }
        ProductDeletion::Restrict => {
            let references = products::reference_count(conn, product)?;
            if references > 0 {
                debug!(product = %product, references, "deletion refused");
                return Err(SwapError::validation(
                    "product_id",
                    format!("product is still referenced by {references} records"),
                ));
            }
            products::hard_delete(conn, product)?;
        }
    }
    info!(product = %product, policy = ?rules.product_deletion, "product deleted");
    Ok(())
}
