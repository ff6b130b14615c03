// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction and match engine for the Swapmatch exchange marketplace.
//!
//! Users react to products with a like, a dislike or a superlike (which may
//! carry a counter-offer). Once two users each showed positive interest in a
//! product the other owns, a match between them is created, exactly once per
//! pair. [`Matchmaker`] is the async facade; the modules below hold the
//! synchronous logic that runs inside a single storage transaction.

pub mod catalog;
pub mod conversations;
pub mod detector;
pub mod feed;
pub mod ledger;
pub mod proposals;
pub mod service;
pub mod store;

pub use service::Matchmaker;
