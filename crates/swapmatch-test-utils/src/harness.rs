// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for engine integration testing.
//!
//! `TestHarness` opens a file-backed SQLite database in a temp directory
//! through the regular storage adapter (migrations, PRAGMAs, WAL) and wires a
//! [`Matchmaker`] to it.

use std::sync::Arc;

use rust_decimal::Decimal;
use swapmatch_config::model::{MatchingConfig, StorageConfig, SwapmatchConfig};
use swapmatch_core::{
    CategoryId, NewProduct, NewUser, PluginAdapter, ProductId, StorageAdapter, SwapError, UserId,
};
use swapmatch_engine::Matchmaker;
use swapmatch_storage::SqliteStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    matching: MatchingConfig,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            matching: MatchingConfig::default(),
            wal_mode: true,
        }
    }

    /// Override the interaction and match rules.
    pub fn with_rules(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Toggle WAL journaling for the temp database.
    pub fn with_wal(mut self, enabled: bool) -> Self {
        self.wal_mode = enabled;
        self
    }

    /// Build the test harness, creating the temp database and the engine.
    pub async fn build(self) -> Result<TestHarness, SwapError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SwapError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: self.wal_mode,
            busy_timeout_ms: 1000,
        };
        let storage = SqliteStorage::new(storage_config.clone());
        storage.initialize().await?;
        let engine = Matchmaker::new(storage.database()?, self.matching.clone());

        let config = SwapmatchConfig {
            storage: storage_config,
            matching: self.matching,
            ..SwapmatchConfig::default()
        };

        Ok(TestHarness {
            engine,
            storage: Arc::new(storage),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment: temp database, storage adapter and engine.
pub struct TestHarness {
    /// The engine under test.
    pub engine: Matchmaker,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// Configuration the harness was built with.
    pub config: SwapmatchConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default rules.
    pub async fn new() -> Result<Self, SwapError> {
        Self::builder().build().await
    }

    /// Register a user named `name` with a derived, unique email.
    pub async fn user(&self, name: &str) -> Result<UserId, SwapError> {
        let user = self
            .engine
            .register_user(NewUser {
                name: name.to_string(),
                email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
                phone: None,
            })
            .await?;
        Ok(user.id)
    }

    /// List a product for `owner` in the first seeded category.
    pub async fn product(&self, owner: UserId, name: &str) -> Result<ProductId, SwapError> {
        self.product_in(owner, name, CategoryId(1)).await
    }

    pub async fn product_in(
        &self,
        owner: UserId,
        name: &str,
        category: CategoryId,
    ) -> Result<ProductId, SwapError> {
        let product = self
            .engine
            .create_product(NewProduct {
                owner_id: owner,
                name: name.to_string(),
                description: format!("{name} in good condition"),
                price: Decimal::new(4990, 2),
                category_id: category,
            })
            .await?;
        Ok(product.id)
    }

    /// Checkpoint and close the database.
    pub async fn shutdown(&self) -> Result<(), SwapError> {
        self.storage.shutdown().await?;
        self.storage.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_with_fixtures() {
        let harness = TestHarness::new().await.unwrap();
        let ana = harness.user("Ana").await.unwrap();
        let lamp = harness.product(ana, "Lamp").await.unwrap();
        let feed = harness.engine.swipe_feed(ana, None).await.unwrap();
        assert!(feed.iter().all(|p| p.id != lamp));
        harness.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn custom_rules_reach_the_engine() {
        let harness = TestHarness::builder()
            .with_rules(MatchingConfig {
                require_offer_ownership: true,
                ..MatchingConfig::default()
            })
            .with_wal(false)
            .build()
            .await
            .unwrap();
        assert!(harness.engine.rules().require_offer_ownership);
        assert!(!harness.config.storage.wal_mode);
    }
}
