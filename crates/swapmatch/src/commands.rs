// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch of one-shot subcommands onto the matchmaking engine.

use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use swapmatch_config::SwapmatchConfig;
use swapmatch_core::{
    CategoryId, MatchId, NewProduct, NewUser, ProductId, StorageAdapter, SuperlikeRequest,
    SwapError, UserId,
};
use swapmatch_engine::Matchmaker;
use swapmatch_storage::SqliteStorage;

use crate::Commands;

/// Open the store, run `command` and close the store again.
///
/// The store is closed whether the command succeeded, failed or was
/// interrupted by `token`.
pub async fn execute(
    config: &SwapmatchConfig,
    command: Commands,
    token: CancellationToken,
) -> Result<Value, SwapError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let result = match storage.database() {
        Ok(db) => {
            let engine = Matchmaker::new(db, config.matching.clone());
            tokio::select! {
                result = dispatch(&engine, command) => result,
                _ = token.cancelled() => Err(SwapError::Internal("interrupted".to_string())),
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    result
}

async fn dispatch(engine: &Matchmaker, command: Commands) -> Result<Value, SwapError> {
    debug!(?command, "dispatching command");
    match command {
        Commands::Migrate => Ok(json!({ "migrated": true })),
        Commands::Categories => to_json(engine.categories().await?),
        Commands::RegisterUser { name, email, phone } => to_json(
            engine
                .register_user(NewUser { name, email, phone })
                .await?,
        ),
        Commands::CreateProduct {
            owner,
            name,
            description,
            price,
            category,
        } => to_json(
            engine
                .create_product(NewProduct {
                    owner_id: UserId(owner),
                    name,
                    description,
                    price,
                    category_id: CategoryId(category),
                })
                .await?,
        ),
        Commands::DeleteProduct { owner, product } => {
            engine
                .delete_product(UserId(owner), ProductId(product))
                .await?;
            Ok(json!({ "deleted": product }))
        }
        Commands::Like { user, product } => {
            to_json(engine.like(UserId(user), ProductId(product)).await?)
        }
        Commands::Dislike { user, product } => {
            to_json(engine.dislike(UserId(user), ProductId(product)).await?)
        }
        Commands::Superlike {
            user,
            product,
            message,
            offer,
        } => to_json(
            engine
                .superlike(SuperlikeRequest {
                    actor_id: UserId(user),
                    product_id: ProductId(product),
                    message,
                    offered_product_id: offer.map(ProductId),
                })
                .await?,
        ),
        Commands::Undo { user, product } => {
            to_json(engine.undo(UserId(user), ProductId(product)).await?)
        }
        Commands::Matches { user } => to_json(engine.list_matches(UserId(user)).await?),
        Commands::Match { user, match_id } => {
            to_json(engine.get_match(UserId(user), MatchId(match_id)).await?)
        }
        Commands::Feed { user, category } => to_json(
            engine
                .swipe_feed(UserId(user), category.map(CategoryId))
                .await?,
        ),
        Commands::Proposals { user, product } => to_json(
            engine
                .proposals_for_product(ProductId(product), UserId(user))
                .await?,
        ),
        Commands::Likes { user } => to_json(engine.likes_given(UserId(user)).await?),
        Commands::Potential { user } => {
            to_json(engine.potential_matches(UserId(user)).await?)
        }
        Commands::Superlikes { user, received } => {
            if received {
                to_json(engine.superlikes_received(UserId(user)).await?)
            } else {
                to_json(engine.superlikes_sent(UserId(user)).await?)
            }
        }
        Commands::Stats { product } => to_json(engine.product_stats(ProductId(product)).await?),
        Commands::Send {
            user,
            match_id,
            content,
        } => to_json(
            engine
                .post_message(UserId(user), MatchId(match_id), content)
                .await?,
        ),
        Commands::Conversation { user, match_id } => {
            to_json(engine.conversation(UserId(user), MatchId(match_id)).await?)
        }
        Commands::Doctor { .. } => Err(SwapError::Internal(
            "doctor runs outside the command dispatcher".to_string(),
        )),
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, SwapError> {
    serde_json::to_value(value).map_err(|e| SwapError::Internal(format!("encode result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapmatch_config::model::StorageConfig;
    use tempfile::tempdir;

    fn config_at(dir: &std::path::Path) -> SwapmatchConfig {
        SwapmatchConfig {
            storage: StorageConfig {
                database_path: dir.join("cli.db").to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
            ..SwapmatchConfig::default()
        }
    }

    #[tokio::test]
    async fn migrate_creates_database() {
        let dir = tempdir().unwrap();
        let config = config_at(dir.path());
        let value = execute(&config, Commands::Migrate, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value["migrated"], true);
        assert!(dir.path().join("cli.db").exists());
    }

    #[tokio::test]
    async fn state_persists_between_invocations() {
        let dir = tempdir().unwrap();
        let config = config_at(dir.path());

        let user = execute(
            &config,
            Commands::RegisterUser {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(user["name"], "Ana");

        let feed = execute(
            &config,
            Commands::Feed {
                user: user["id"].as_i64().unwrap(),
                category: None,
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(feed, json!([]));
    }

    #[tokio::test]
    async fn cancelled_token_interrupts_command() {
        let dir = tempdir().unwrap();
        let config = config_at(dir.path());
        let token = CancellationToken::new();
        token.cancel();
        // A pre-cancelled token races the command; either branch is acceptable,
        // but the store must always be closed afterwards.
        let _ = execute(&config, Commands::Categories, token).await;
        let value = execute(&config, Commands::Categories, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(13));
    }

    #[tokio::test]
    async fn engine_errors_propagate() {
        let dir = tempdir().unwrap();
        let config = config_at(dir.path());
        let err = execute(
            &config,
            Commands::Like {
                user: 1,
                product: 1,
            },
            CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
