// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product categories. The default set is seeded by migration.

use rusqlite::{Connection, OptionalExtension, params};
use swapmatch_core::{Category, CategoryId, SwapError};

use crate::database::sql_err;

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>, SwapError> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM categories ORDER BY id ASC")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Category {
                id: CategoryId(row.get(0)?),
                name: row.get(1)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

pub fn find_category(conn: &Connection, id: CategoryId) -> Result<Option<Category>, SwapError> {
    conn.query_row(
        "SELECT id, name FROM categories WHERE id = ?1",
        params![id.0],
        |row| {
            Ok(Category {
                id: CategoryId(row.get(0)?),
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(sql_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn default_categories_are_seeded_in_order() {
        let conn = fixtures::conn();
        let categories = list_categories(&conn).unwrap();
        assert_eq!(categories.len(), 13);
        assert_eq!(categories[0].name, "Tools");
        assert_eq!(categories[12].name, "Pets");
    }

    #[test]
    fn find_by_id() {
        let conn = fixtures::conn();
        let tools = find_category(&conn, CategoryId(1)).unwrap().unwrap();
        assert_eq!(tools.name, "Tools");
        assert!(find_category(&conn, CategoryId(500)).unwrap().is_none());
    }
}
