// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the transactional data store.

use async_trait::async_trait;

use crate::error::SwapError;
use crate::traits::adapter::PluginAdapter;

/// Lifecycle of the data store handle.
///
/// The handle is opened once at startup, injected into the engine, and
/// closed on shutdown. Nothing in the engine reaches for a global handle.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the store and applies pending migrations.
    async fn initialize(&self) -> Result<(), SwapError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), SwapError>;
}
