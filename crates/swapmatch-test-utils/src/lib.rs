// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Swapmatch integration tests.
//!
//! Provides a harness with a temp SQLite database, a ready [`Matchmaker`]
//! and fixture builders for users and products, so tests stay fast and
//! deterministic.
//!
//! [`Matchmaker`]: swapmatch_engine::Matchmaker

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
