// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Swapmatch configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwapmatchConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Interaction and match rules.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// How long a writer waits on a lock held by another process.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("swapmatch").join("swapmatch.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("swapmatch.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// What deleting a product does to rows that reference it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductDeletion {
    /// Mark the product deleted; history keeps resolving it.
    #[default]
    Soft,
    /// Refuse while any interaction, proposal or match references it.
    Restrict,
}

/// Interaction and match rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Upper bound on a superlike message, in characters.
    #[serde(default = "default_superlike_message_max_chars")]
    pub superlike_message_max_chars: usize,

    /// Require the product offered in a superlike to belong to the actor.
    #[serde(default)]
    pub require_offer_ownership: bool,

    /// Reject reactions to the actor's own products.
    #[serde(default = "default_forbid_self_interaction")]
    pub forbid_self_interaction: bool,

    /// Product deletion policy.
    #[serde(default)]
    pub product_deletion: ProductDeletion,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            superlike_message_max_chars: default_superlike_message_max_chars(),
            require_offer_ownership: false,
            forbid_self_interaction: default_forbid_self_interaction(),
            product_deletion: ProductDeletion::default(),
        }
    }
}

fn default_superlike_message_max_chars() -> usize {
    500
}

fn default_forbid_self_interaction() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
