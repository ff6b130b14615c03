// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use swapmatch_config::diagnostic::ConfigError;
use swapmatch_config::model::ProductDeletion;
use swapmatch_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[storage]
database_path = "/tmp/swapmatch-test.db"
wal_mode = false
busy_timeout_ms = 250

[matching]
superlike_message_max_chars = 280
require_offer_ownership = true
forbid_self_interaction = false
product_deletion = "restrict"

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.database_path, "/tmp/swapmatch-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 250);
    assert_eq!(config.matching.superlike_message_max_chars, 280);
    assert!(config.matching.require_offer_ownership);
    assert!(!config.matching.forbid_self_interaction);
    assert_eq!(config.matching.product_deletion, ProductDeletion::Restrict);
    assert_eq!(config.log.level, "debug");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert!(config.storage.database_path.ends_with("swapmatch.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 5000);
    assert_eq!(config.matching.superlike_message_max_chars, 500);
    assert_eq!(config.log.level, "info");
}

#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[storage]
databse_path = "/tmp/x.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("an UnknownKey diagnostic");
    assert_eq!(unknown.0, "databse_path");
    assert_eq!(unknown.1.as_deref(), Some("database_path"));
}

#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[matching]
superlike_message_max_chars = "lots"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string for usize");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. }))
    );
}

#[test]
fn semantic_validation_runs_after_parsing() {
    let toml = r#"
[log]
level = "shouty"
"#;
    let errors = load_and_validate_str(toml).expect_err("bad log level");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[storage]
database_path = "from-file.db"

[log]
level = "warn"
"#,
        )?;
        jail.set_env("SWAPMATCH_STORAGE_DATABASE_PATH", "from-env.db");
        jail.set_env("SWAPMATCH_MATCHING_REQUIRE_OFFER_OWNERSHIP", "true");

        let config = load_config_from_path(std::path::Path::new("custom.toml"))?;
        assert_eq!(config.storage.database_path, "from-env.db");
        assert!(config.matching.require_offer_ownership);
        assert_eq!(config.log.level, "warn");
        Ok(())
    });
}
