// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the swapmatch tables.
//!
//! Every function is synchronous and takes a borrowed connection (or a
//! transaction, which derefs to one), so callers compose several queries
//! inside a single writer-thread closure.

pub mod categories;
pub mod interactions;
pub mod matches;
pub mod messages;
pub mod products;
pub mod proposals;
pub mod users;

use std::str::FromStr;

use rusqlite::types::Type;
use rust_decimal::Decimal;
use swapmatch_core::InteractionKind;

pub(crate) fn kind_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<InteractionKind> {
    let raw: String = row.get(idx)?;
    InteractionKind::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Quoted SQL list of the kinds that count as interest for matching.
pub(crate) fn positive_kinds_sql() -> String {
    InteractionKind::ALL
        .iter()
        .filter(|kind| kind.is_positive())
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prices are stored as decimal text to keep them exact.
pub(crate) fn decimal_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
