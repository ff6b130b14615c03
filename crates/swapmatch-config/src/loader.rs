// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./swapmatch.toml` > `~/.config/swapmatch/swapmatch.toml`
//! > `/etc/swapmatch/swapmatch.toml` with environment variable overrides via the
//! `SWAPMATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SwapmatchConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/swapmatch/swapmatch.toml";
pub(crate) const LOCAL_CONFIG: &str = "swapmatch.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/swapmatch/swapmatch.toml`
/// 3. `~/.config/swapmatch/swapmatch.toml`
/// 4. `./swapmatch.toml`
/// 5. `SWAPMATCH_*` environment variables
pub fn load_config() -> Result<SwapmatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SwapmatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwapmatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwapmatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwapmatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwapmatchConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

pub(crate) fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("swapmatch").join("swapmatch.toml"))
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `SWAPMATCH_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("SWAPMATCH_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("storage_", "storage.", 1)
            .replacen("matching_", "matching.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
