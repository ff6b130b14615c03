// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction ledger: one directed reaction per (user, product) pair.
//!
//! The ledger runs inside a caller-supplied transaction. The duplicate
//! lookup is only a fast path; the unique index on `(user_id, product_id)`
//! is what decides when two writers race for the same pair.

use std::collections::HashMap;

use rusqlite::Connection;
use swapmatch_config::MatchingConfig;
use swapmatch_core::{
    Entity, Interaction, InteractionKind, PotentialMatch, ProductId, ProductStats,
    ProductSummary, ProposalDetails, ReceivedSuperlike, SentSuperlike, SwapError, UserId,
    UserSummary,
};
use swapmatch_storage::queries::{interactions, products, proposals as proposal_rows, users};
use tracing::debug;

use crate::proposals;

/// Resolve the product being reacted to and reject reactions the rules forbid.
pub fn resolve_target(
    conn: &Connection,
    rules: &MatchingConfig,
    actor: UserId,
    product: ProductId,
) -> Result<ProductSummary, SwapError> {
    users::require_user(conn, actor)?;
    let target = products::require_product(conn, product, Entity::Product)?;
    if rules.forbid_self_interaction && target.owner_id == actor {
        return Err(SwapError::validation(
            "product_id",
            "cannot react to your own product",
        ));
    }
    Ok(target)
}

/// Fail with `Conflict` if the actor already reacted to the product.
pub fn ensure_first_reaction(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<(), SwapError> {
    match interactions::find_kind(conn, actor, product)? {
        Some(existing) => Err(SwapError::Conflict { existing }),
        None => Ok(()),
    }
}

/// Record a like or a dislike.
pub fn record(
    conn: &Connection,
    rules: &MatchingConfig,
    actor: UserId,
    product: ProductId,
    kind: InteractionKind,
) -> Result<Interaction, SwapError> {
    resolve_target(conn, rules, actor, product)?;
    ensure_first_reaction(conn, actor, product)?;
    let interaction = interactions::insert(conn, actor, product, kind, None)?;
    debug!(
        actor = %actor,
        product = %product,
        kind = %kind,
        interaction = %interaction.id,
        "interaction recorded"
    );
    Ok(interaction)
}

/// Trim a superlike message and check it against the configured bound.
pub fn validate_message(rules: &MatchingConfig, message: &str) -> Result<String, SwapError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(SwapError::validation("message", "must not be empty"));
    }
    let max = rules.superlike_message_max_chars;
    if message.chars().count() > max {
        return Err(SwapError::validation(
            "message",
            format!("must be at most {max} characters"),
        ));
    }
    Ok(message.to_string())
}

/// Record a superlike and, when an offer is attached, its proposal.
///
/// Both rows are written through `conn`, which must be a transaction: if the
/// proposal fails the superlike must not survive.
pub fn record_superlike(
    conn: &Connection,
    rules: &MatchingConfig,
    actor: UserId,
    product: ProductId,
    message: &str,
    offered: Option<ProductId>,
) -> Result<(Interaction, Option<ProposalDetails>), SwapError> {
    let message = validate_message(rules, message)?;
    resolve_target(conn, rules, actor, product)?;
    if let Some(offered) = offered {
        proposals::validate_offer(conn, rules, actor, product, offered)?;
    }
    ensure_first_reaction(conn, actor, product)?;

    let interaction = interactions::insert(
        conn,
        actor,
        product,
        InteractionKind::Superlike,
        Some(message.as_str()),
    )?;
    let proposal = offered
        .map(|offered| proposals::create_proposal(conn, interaction.id, actor, offered, product))
        .transpose()?;
    debug!(
        actor = %actor,
        product = %product,
        interaction = %interaction.id,
        with_offer = proposal.is_some(),
        "superlike recorded"
    );
    Ok((interaction, proposal))
}

/// Kind of the actor's reaction to the product, if any.
pub fn query_interaction(
    conn: &Connection,
    actor: UserId,
    product: ProductId,
) -> Result<Option<InteractionKind>, SwapError> {
    interactions::find_kind(conn, actor, product)
}

/// Remove the actor's reaction. Its proposal goes with it; matches stay.
pub fn undo(conn: &Connection, actor: UserId, product: ProductId) -> Result<Interaction, SwapError> {
    let removed = interactions::delete(conn, actor, product)?.ok_or(SwapError::NotFound {
        entity: Entity::Interaction,
        id: product.0,
    })?;
    debug!(actor = %actor, product = %product, kind = %removed.kind, "interaction undone");
    Ok(removed)
}

pub fn product_stats(conn: &Connection, product: ProductId) -> Result<ProductStats, SwapError> {
    products::require_product_including_deleted(conn, product)?;
    interactions::stats_for_product(conn, product)
}

pub fn likes_given(conn: &Connection, actor: UserId) -> Result<Vec<Interaction>, SwapError> {
    users::require_user(conn, actor)?;
    interactions::list_by_actor(conn, actor, InteractionKind::Like)
}

pub fn superlikes_sent(conn: &Connection, actor: UserId) -> Result<Vec<SentSuperlike>, SwapError> {
    users::require_user(conn, actor)?;
    interactions::list_by_actor(conn, actor, InteractionKind::Superlike)?
        .into_iter()
        .map(|interaction| {
            let product = products::require_product_including_deleted(conn, interaction.product_id)?;
            let proposals = proposal_rows::list_for_interaction(conn, interaction.id)?
                .into_iter()
                .map(|row| proposals::details(conn, row))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SentSuperlike {
                interaction,
                product,
                proposals,
            })
        })
        .collect()
}

pub fn superlikes_received(
    conn: &Connection,
    owner: UserId,
) -> Result<Vec<ReceivedSuperlike>, SwapError> {
    users::require_user(conn, owner)?;
    interactions::list_received(conn, owner, InteractionKind::Superlike)?
        .into_iter()
        .map(|interaction| {
            let from = users::require_user(conn, interaction.actor_id)?;
            let product = products::require_product_including_deleted(conn, interaction.product_id)?;
            Ok(ReceivedSuperlike {
                interaction,
                from,
                product,
            })
        })
        .collect()
}

/// Every product `actor` liked, newest like first, with the other users
/// who liked it too.
pub fn potential_matches(
    conn: &Connection,
    actor: UserId,
) -> Result<Vec<PotentialMatch>, SwapError> {
    users::require_user(conn, actor)?;
    let mut interested: HashMap<ProductId, Vec<UserSummary>> = HashMap::new();
    for (product, other) in interactions::co_likers(conn, actor)? {
        let other = users::require_user(conn, other)?;
        interested.entry(product).or_default().push(other);
    }
    interactions::list_by_actor(conn, actor, InteractionKind::Like)?
        .into_iter()
        .map(|like| {
            Ok(PotentialMatch {
                product: products::require_product_including_deleted(conn, like.product_id)?,
                interested: interested.remove(&like.product_id).unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{conn, product, user};

    #[test]
    fn every_second_reaction_conflicts() {
        let kinds = [
            InteractionKind::Like,
            InteractionKind::Dislike,
            InteractionKind::Superlike,
        ];
        for first in kinds {
            for second in kinds {
                let conn = conn();
                let rules = MatchingConfig::default();
                let ana = user(&conn, "Ana");
                let bia = user(&conn, "Bia");
                let lamp = product(&conn, bia, "lamp");

                interactions::insert(&conn, ana, lamp, first, Some("hi")).unwrap();
                let err = match second {
                    InteractionKind::Superlike => {
                        record_superlike(&conn, &rules, ana, lamp, "again", None).unwrap_err()
                    }
                    kind => record(&conn, &rules, ana, lamp, kind).unwrap_err(),
                };
                match err {
                    SwapError::Conflict { existing } => assert_eq!(existing, first),
                    other => panic!("expected conflict, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn superlike_message_is_trimmed_and_bounded() {
        let rules = MatchingConfig {
            superlike_message_max_chars: 5,
            ..MatchingConfig::default()
        };
        assert_eq!(validate_message(&rules, "  hey  ").unwrap(), "hey");
        assert!(validate_message(&rules, "   ").is_err());
        assert!(validate_message(&rules, "ação!").is_ok(), "counts chars, not bytes");
        assert!(matches!(
            validate_message(&rules, "too long"),
            Err(SwapError::Validation { field: "message", .. })
        ));
    }

    #[test]
    fn superlike_with_offer_writes_proposal() {
        let conn = conn();
        let rules = MatchingConfig::default();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, bia, "lamp");
        let bike = product(&conn, ana, "bike");

        let (interaction, proposal) =
            record_superlike(&conn, &rules, ana, lamp, "swap for my bike?", Some(bike)).unwrap();
        assert_eq!(interaction.kind, InteractionKind::Superlike);
        assert_eq!(interaction.message.as_deref(), Some("swap for my bike?"));
        let proposal = proposal.unwrap();
        assert_eq!(proposal.offered_product.id, bike);
        assert_eq!(proposal.requested_product_id, lamp);

        let sent = superlikes_sent(&conn, ana).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].proposals, vec![proposal]);
        let received = superlikes_received(&conn, bia).unwrap();
        assert_eq!(received[0].from.id, ana);
    }

    #[test]
    fn missing_product_is_not_found() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        let err = record(
            &conn,
            &MatchingConfig::default(),
            ana,
            ProductId(404),
            InteractionKind::Like,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SwapError::NotFound {
                entity: Entity::Product,
                id: 404
            }
        ));
    }

    #[test]
    fn self_reaction_follows_rule() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        let lamp = product(&conn, ana, "lamp");

        let strict = MatchingConfig::default();
        let err = record(&conn, &strict, ana, lamp, InteractionKind::Like).unwrap_err();
        assert!(matches!(err, SwapError::Validation { field: "product_id", .. }));

        let lenient = MatchingConfig {
            forbid_self_interaction: false,
            ..MatchingConfig::default()
        };
        record(&conn, &lenient, ana, lamp, InteractionKind::Like).unwrap();
    }

    #[test]
    fn undo_then_react_again() {
        let conn = conn();
        let rules = MatchingConfig::default();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, bia, "lamp");

        record(&conn, &rules, ana, lamp, InteractionKind::Dislike).unwrap();
        assert_eq!(
            query_interaction(&conn, ana, lamp).unwrap(),
            Some(InteractionKind::Dislike)
        );
        undo(&conn, ana, lamp).unwrap();
        assert_eq!(query_interaction(&conn, ana, lamp).unwrap(), None);
        assert!(matches!(
            undo(&conn, ana, lamp),
            Err(SwapError::NotFound {
                entity: Entity::Interaction,
                ..
            })
        ));
        record(&conn, &rules, ana, lamp, InteractionKind::Like).unwrap();
    }

    #[test]
    fn likes_given_lists_only_likes() {
        let conn = conn();
        let rules = MatchingConfig::default();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, bia, "lamp");
        let kite = product(&conn, bia, "kite");

        record(&conn, &rules, ana, lamp, InteractionKind::Like).unwrap();
        record(&conn, &rules, ana, kite, InteractionKind::Dislike).unwrap();
        let likes = likes_given(&conn, ana).unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].product_id, lamp);
    }

    #[test]
    fn superlike_rolls_back_when_proposal_cannot_be_written() {
        let mut conn = conn();
        let rules = MatchingConfig::default();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, bia, "lamp");
        let bike = product(&conn, ana, "bike");

        conn.execute_batch(
            "CREATE TRIGGER reject_proposals BEFORE INSERT ON proposals
             BEGIN SELECT RAISE(ABORT, 'proposals unavailable'); END;",
        )
        .unwrap();
        let err = swapmatch_storage::immediate(&mut conn, |tx| {
            record_superlike(tx, &rules, ana, lamp, "swap?", Some(bike))
        })
        .unwrap_err();
        assert!(matches!(err, SwapError::Storage { .. }), "{err:?}");
        assert_eq!(query_interaction(&conn, ana, lamp).unwrap(), None);

        conn.execute_batch("DROP TRIGGER reject_proposals;").unwrap();
        let (interaction, proposal) = swapmatch_storage::immediate(&mut conn, |tx| {
            record_superlike(tx, &rules, ana, lamp, "swap?", Some(bike))
        })
        .unwrap();
        assert_eq!(interaction.kind, InteractionKind::Superlike);
        assert_eq!(proposal.unwrap().offered_product.id, bike);
    }

    #[test]
    fn potential_matches_group_other_likers_by_product() {
        let conn = conn();
        let rules = MatchingConfig::default();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let caio = user(&conn, "Caio");
        let owner = user(&conn, "Owner");
        let lamp = product(&conn, owner, "lamp");
        let kite = product(&conn, owner, "kite");

        record(&conn, &rules, ana, lamp, InteractionKind::Like).unwrap();
        record(&conn, &rules, ana, kite, InteractionKind::Like).unwrap();
        record(&conn, &rules, bia, lamp, InteractionKind::Like).unwrap();
        record(&conn, &rules, caio, lamp, InteractionKind::Like).unwrap();

        let potential = potential_matches(&conn, ana).unwrap();
        assert_eq!(potential.len(), 2);
        assert_eq!(potential[0].product.id, kite, "newest like first");
        assert!(potential[0].interested.is_empty());
        assert_eq!(potential[1].product.id, lamp);
        let names: Vec<&str> = potential[1]
            .interested
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(names, ["Bia", "Caio"]);

        assert!(matches!(
            potential_matches(&conn, UserId(404)),
            Err(SwapError::NotFound {
                entity: Entity::User,
                ..
            })
        ));
    }
}
