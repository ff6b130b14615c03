// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swipe feed: live products the viewer has not reacted to and does not own.

use rusqlite::Connection;
use swapmatch_core::{CategoryId, Entity, ProductSummary, SwapError, UserId};
use swapmatch_storage::queries::{categories, products, users};

pub fn swipe_feed(
    conn: &Connection,
    viewer: UserId,
    category: Option<CategoryId>,
) -> Result<Vec<ProductSummary>, SwapError> {
    users::require_user(conn, viewer)?;
    if let Some(id) = category {
        categories::find_category(conn, id)?.ok_or(SwapError::NotFound {
            entity: Entity::Category,
            id: id.0,
        })?;
    }
    products::list_unseen(conn, viewer, category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{conn, product, user};
    use swapmatch_core::InteractionKind;
    use swapmatch_storage::queries::interactions;

    #[test]
    fn reacted_products_leave_the_feed() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, bia, "lamp");
        let kite = product(&conn, bia, "kite");
        product(&conn, ana, "mine");

        let ids: Vec<_> = swipe_feed(&conn, ana, None).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![kite, lamp]);

        interactions::insert(&conn, ana, kite, InteractionKind::Dislike, None).unwrap();
        let ids: Vec<_> = swipe_feed(&conn, ana, None).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![lamp]);
    }

    #[test]
    fn unknown_category_is_not_found() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        assert!(matches!(
            swipe_feed(&conn, ana, Some(CategoryId(999))),
            Err(SwapError::NotFound {
                entity: Entity::Category,
                id: 999
            })
        ));
    }
}
