// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product catalog queries.
//!
//! A soft-deleted product keeps its row (interactions, proposals and matches
//! still reference it) but is invisible to the feed and to new reactions.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{
    Category, CategoryId, Entity, NewProduct, ProductId, ProductSummary, SwapError, UserId,
};

use crate::database::sql_err;
use crate::queries::decimal_column;

const SELECT_PRODUCT: &str = "SELECT p.id, p.owner_id, p.name, p.description, p.price, c.id, c.name
     FROM products p JOIN categories c ON c.id = p.category_id";

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProductSummary> {
    Ok(ProductSummary {
        id: ProductId(row.get(0)?),
        owner_id: UserId(row.get(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
        price: decimal_column(row, 4)?,
        category: Category {
            id: CategoryId(row.get(5)?),
            name: row.get(6)?,
        },
    })
}

pub fn insert_product(conn: &Connection, product: &NewProduct) -> Result<ProductSummary, SwapError> {
    conn.execute(
        "INSERT INTO products (owner_id, category_id, name, description, price)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product.owner_id.0,
            product.category_id.0,
            product.name,
            product.description,
            product.price.to_string(),
        ],
    )
    .map_err(sql_err)?;
    let id = ProductId(conn.last_insert_rowid());
    require_product(conn, id, Entity::Product)
}

/// Look up a live (not deleted) product.
pub fn find_product(conn: &Connection, id: ProductId) -> Result<Option<ProductSummary>, SwapError> {
    conn.query_row(
        &format!("{SELECT_PRODUCT} WHERE p.id = ?1 AND p.deleted_at IS NULL"),
        params![id.0],
        product_from_row,
    )
    .optional()
    .map_err(sql_err)
}

/// Look up a product whether or not it has been deleted. History views use
/// this so past matches and proposals keep resolving.
pub fn find_product_including_deleted(
    conn: &Connection,
    id: ProductId,
) -> Result<Option<ProductSummary>, SwapError> {
    conn.query_row(
        &format!("{SELECT_PRODUCT} WHERE p.id = ?1"),
        params![id.0],
        product_from_row,
    )
    .optional()
    .map_err(sql_err)
}

/// Live product, or `NotFound` tagged with `entity`.
pub fn require_product(
    conn: &Connection,
    id: ProductId,
    entity: Entity,
) -> Result<ProductSummary, SwapError> {
    find_product(conn, id)?.ok_or(SwapError::NotFound { entity, id: id.0 })
}

/// Any product row, or `NotFound`.
pub fn require_product_including_deleted(
    conn: &Connection,
    id: ProductId,
) -> Result<ProductSummary, SwapError> {
    find_product_including_deleted(conn, id)?.ok_or(SwapError::NotFound {
        entity: Entity::Product,
        id: id.0,
    })
}

/// Live products the viewer does not own and has not reacted to yet,
/// optionally restricted to one category. Newest listing first.
pub fn list_unseen(
    conn: &Connection,
    viewer: UserId,
    category: Option<CategoryId>,
) -> Result<Vec<ProductSummary>, SwapError> {
    let sql = format!(
        "{SELECT_PRODUCT}
         WHERE p.deleted_at IS NULL
           AND p.owner_id <> ?1
           AND (?2 IS NULL OR p.category_id = ?2)
           AND NOT EXISTS (
               SELECT 1 FROM interactions i WHERE i.user_id = ?1 AND i.product_id = p.id
           )
         ORDER BY p.id DESC"
    );
    let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
    let rows = stmt
        .query_map(params![viewer.0, category.map(|c| c.0)], product_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

pub fn list_by_owner(conn: &Connection, owner: UserId) -> Result<Vec<ProductSummary>, SwapError> {
    let sql = format!(
        "{SELECT_PRODUCT} WHERE p.owner_id = ?1 AND p.deleted_at IS NULL ORDER BY p.id ASC"
    );
    let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
    let rows = stmt
        .query_map(params![owner.0], product_from_row)
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Number of interactions, proposals and matches pointing at the product.
pub fn reference_count(conn: &Connection, id: ProductId) -> Result<i64, SwapError> {
    conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM interactions WHERE product_id = ?1)
          + (SELECT COUNT(*) FROM proposals
               WHERE offered_product_id = ?1 OR requested_product_id = ?1)
          + (SELECT COUNT(*) FROM matches WHERE product1_id = ?1 OR product2_id = ?1)",
        params![id.0],
        |row| row.get(0),
    )
    .map_err(sql_err)
}

/// Mark a live product deleted. Returns false if it was absent or already deleted.
pub fn soft_delete(conn: &Connection, id: ProductId) -> Result<bool, SwapError> {
    let changed = conn
        .execute(
            "UPDATE products SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND deleted_at IS NULL",
            params![id.0],
        )
        .map_err(sql_err)?;
    Ok(changed > 0)
}

/// Remove the row. Fails on foreign keys if anything still references it.
pub fn hard_delete(conn: &Connection, id: ProductId) -> Result<bool, SwapError> {
    let changed = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id.0])
        .map_err(sql_err)?;
    Ok(changed > 0)
}
