// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swapmatch - mutual-interest matchmaking for a product exchange.
//!
//! This is the binary entry point. Every subcommand opens the store, runs
//! one engine operation, prints the result as JSON and closes the store.

mod commands;
mod doctor;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use swapmatch_config::SwapmatchConfig;
use swapmatch_core::SwapError;

/// Swapmatch - mutual-interest matchmaking for a product exchange.
#[derive(Parser, Debug)]
#[command(name = "swapmatch", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create the database if needed and apply pending migrations.
    Migrate,
    /// List product categories.
    Categories,
    /// Register a user.
    RegisterUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List a product for exchange.
    CreateProduct {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: i64,
    },
    /// Delete one of your products.
    DeleteProduct {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        product: i64,
    },
    /// Like a product.
    Like {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        product: i64,
    },
    /// Reject a product.
    Dislike {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        product: i64,
    },
    /// Superlike a product, optionally offering one of yours in exchange.
    Superlike {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        product: i64,
        #[arg(long)]
        message: String,
        #[arg(long)]
        offer: Option<i64>,
    },
    /// Withdraw your reaction to a product.
    Undo {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        product: i64,
    },
    /// List your matches, newest first.
    Matches {
        #[arg(long)]
        user: i64,
    },
    /// Show one of your matches.
    Match {
        #[arg(long)]
        user: i64,
        #[arg(long = "id")]
        match_id: i64,
    },
    /// Products you have not reacted to yet.
    Feed {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        category: Option<i64>,
    },
    /// Proposals you made for a product.
    Proposals {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        product: i64,
    },
    /// Products you liked, newest first.
    Likes {
        #[arg(long)]
        user: i64,
    },
    /// Products you liked, each with the other users who liked it too.
    Potential {
        #[arg(long)]
        user: i64,
    },
    /// Superlikes you sent, or with --received those made on your products.
    Superlikes {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        received: bool,
    },
    /// Reaction counts for a product.
    Stats {
        #[arg(long)]
        product: i64,
    },
    /// Send a chat message inside a match.
    Send {
        #[arg(long)]
        user: i64,
        #[arg(long = "match")]
        match_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Show a match with its chat history.
    Conversation {
        #[arg(long)]
        user: i64,
        #[arg(long = "match")]
        match_id: i64,
    },
    /// Run diagnostic checks against the environment.
    Doctor {
        /// Run intensive checks (integrity scan).
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            swapmatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    if let Commands::Doctor { deep, plain } = cli.command {
        if let Err(e) = doctor::run_doctor(&config, cli.config.as_deref(), deep, plain).await {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let token = shutdown::install_signal_handler();
    match commands::execute(&config, cli.command, token).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to encode result: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(exit_code(&e));
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<SwapmatchConfig, Vec<swapmatch_config::ConfigError>> {
    match path {
        Some(path) => swapmatch_config::load_and_validate_path(path),
        None => swapmatch_config::load_and_validate(),
    }
}

/// Process exit code for a failed command: client errors exit 2, the rest 1.
fn exit_code(error: &SwapError) -> i32 {
    match error.status_code() {
        400..=499 => 2,
        _ => 1,
    }
}

/// Initialize the tracing subscriber with the given log level.
///
/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "swapmatch={log_level},swapmatch_engine={log_level},swapmatch_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
