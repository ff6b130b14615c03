// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `swapmatch-core::types` for use across
//! crate boundaries. This module re-exports the ones the query modules return.

pub use swapmatch_core::types::{
    Category, Interaction, MatchRecord, MessageRecord, ProductStats, ProductSummary, Proposal,
    UserSummary,
};
