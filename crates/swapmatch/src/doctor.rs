// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `swapmatch doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration and the database to
//! surface problems before the matchmaking commands hit them.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use swapmatch_config::SwapmatchConfig;
use swapmatch_core::{HealthStatus, PluginAdapter, StorageAdapter, SwapError};
use swapmatch_storage::SqliteStorage;
use swapmatch_storage::database::sql_err;
use swapmatch_storage::queries::categories;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `swapmatch doctor` command.
///
/// Quick checks always run. With `--deep`, a full integrity scan and a size
/// report are added. With `--plain`, colored output is disabled.
pub async fn run_doctor(
    config: &SwapmatchConfig,
    config_path: Option<&Path>,
    deep: bool,
    plain: bool,
) -> Result<(), SwapError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = vec![check_config(config_path)];

    let db_path = config.storage.database_path.as_str();
    if Path::new(db_path).exists() {
        let storage = SqliteStorage::new(config.storage.clone());
        match storage.initialize().await {
            Ok(()) => {
                results.push(check_database(&storage).await);
                results.push(check_schema(&storage).await);
                if deep {
                    results.push(check_db_integrity(&storage).await);
                    results.push(check_db_size(db_path));
                }
                storage.close().await?;
            }
            Err(e) => results.push(CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                Instant::now(),
            )),
        }
    } else {
        results.push(CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (run `swapmatch migrate` to create it)"),
            Instant::now(),
        ));
    }

    print_report(&results, deep, use_color);
    Ok(())
}

fn print_report(results: &[CheckResult], deep: bool, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  swapmatch doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in results {
        let duration_ms = result.duration.as_millis();
        let line = match (&result.status, use_color) {
            (CheckStatus::Pass, true) => format!(
                "    {} {:<20} {} ({duration_ms}ms)",
                "✓".green(),
                result.name,
                result.message
            ),
            (CheckStatus::Warn, true) => format!(
                "    {} {:<20} {} ({duration_ms}ms)",
                "!".yellow(),
                result.name,
                result.message.yellow()
            ),
            (CheckStatus::Fail, true) => format!(
                "    {} {:<20} {} ({duration_ms}ms)",
                "✗".red(),
                result.name,
                result.message.red()
            ),
            (status, false) => format!(
                "    {:<6} {:<20} {} ({duration_ms}ms)",
                plain_tag(status),
                result.name,
                result.message
            ),
        };
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{line}");
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();
}

fn plain_tag(status: &CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "[OK]",
        CheckStatus::Warn => "[WARN]",
        CheckStatus::Fail => "[FAIL]",
    }
}

/// Check configuration loads without errors.
fn check_config(path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match path {
        Some(path) => swapmatch_config::load_and_validate_path(path),
        None => swapmatch_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Quick health probe through the storage adapter.
async fn check_database(storage: &SqliteStorage) -> CheckResult {
    let start = Instant::now();
    match storage.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Database", CheckStatus::Pass, "connected", start)
        }
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Database", CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Database", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("query failed: {e}"),
            start,
        ),
    }
}

/// Schema is migrated and the category catalog is seeded.
async fn check_schema(storage: &SqliteStorage) -> CheckResult {
    let start = Instant::now();
    let db = match storage.database() {
        Ok(db) => db,
        Err(e) => return CheckResult::new("Schema", CheckStatus::Fail, e.to_string(), start),
    };
    match db.read(categories::list_categories).await {
        Ok(list) if list.is_empty() => CheckResult::new(
            "Schema",
            CheckStatus::Warn,
            "no categories seeded",
            start,
        ),
        Ok(list) => CheckResult::new(
            "Schema",
            CheckStatus::Pass,
            format!("{} categories", list.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "Schema",
            CheckStatus::Fail,
            format!("query failed: {e}"),
            start,
        ),
    }
}

/// Deep check: full SQLite integrity scan.
async fn check_db_integrity(storage: &SqliteStorage) -> CheckResult {
    let start = Instant::now();
    let db = match storage.database() {
        Ok(db) => db,
        Err(e) => {
            return CheckResult::new("DB integrity", CheckStatus::Fail, e.to_string(), start);
        }
    };
    let rows = db
        .read(|conn| {
            let mut stmt = conn.prepare("PRAGMA integrity_check").map_err(sql_err)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(sql_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(sql_err)?;
            Ok(rows)
        })
        .await;
    match rows {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    }
}

/// Deep check: database file size.
fn check_db_size(db_path: &str) -> CheckResult {
    let start = Instant::now();
    match std::fs::metadata(db_path) {
        Ok(meta) => {
            let size_mb = meta.len() as f64 / (1024.0 * 1024.0);
            CheckResult::new(
                "Disk usage",
                CheckStatus::Pass,
                format!("DB size: {size_mb:.1} MB"),
                start,
            )
        }
        Err(e) => CheckResult::new(
            "Disk usage",
            CheckStatus::Warn,
            format!("cannot access: {e}"),
            start,
        ),
    }
}
