// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `Matchmaker` facade.
//!
//! Each public operation is a single closure on the database's writer
//! thread, so its read-check-write sequence never interleaves with another
//! operation on the same handle. Writes run in immediate transactions;
//! dropping one without commit rolls it back. The facade holds no state of
//! its own beyond the injected database handle and rules.

use std::sync::Arc;

use swapmatch_config::MatchingConfig;
use swapmatch_core::{
    Category, CategoryId, Conversation, DislikeOutcome, Interaction, InteractionKind,
    LikeOutcome, MatchId, MatchListing, MessageRecord, NewProduct, NewUser, PotentialMatch,
    ProductId, ProductStats, ProductSummary, ProposalDetails, ReceivedSuperlike, SentSuperlike,
    SuperlikeOutcome, SuperlikeRequest, SwapError, UserId, UserSummary,
};
use swapmatch_storage::{Database, immediate};
use tracing::info;

use crate::{catalog, conversations, detector, feed, ledger, proposals, store};

/// Async entry point to the exchange engine.
#[derive(Clone)]
pub struct Matchmaker {
    db: Database,
    rules: Arc<MatchingConfig>,
}

impl Matchmaker {
    pub fn new(db: Database, rules: MatchingConfig) -> Self {
        Self {
            db,
            rules: Arc::new(rules),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn rules(&self) -> &MatchingConfig {
        &self.rules
    }

    // --- Interaction ledger ---

    /// Record a like, then look for the reverse interest in a second
    /// transaction. The like stays committed whatever detection finds.
    pub async fn like(&self, actor: UserId, product: ProductId) -> Result<LikeOutcome, SwapError> {
        let rules = Arc::clone(&self.rules);
        let outcome = self
            .db
            .exclusive(move |conn| {
                let interaction = immediate(conn, |tx| {
                    ledger::record(tx, &rules, actor, product, InteractionKind::Like)
                })?;
                let matched =
                    immediate(conn, |tx| detector::check_and_create_match(tx, actor, product))?;
                Ok(LikeOutcome {
                    interaction,
                    matched,
                })
            })
            .await?;
        if let Some(matched) = &outcome.matched {
            info!(match_id = %matched.id, actor = %actor, "like completed a match");
        }
        Ok(outcome)
    }

    pub async fn dislike(
        &self,
        actor: UserId,
        product: ProductId,
    ) -> Result<DislikeOutcome, SwapError> {
        let rules = Arc::clone(&self.rules);
        let interaction = self
            .db
            .write(move |tx| ledger::record(tx, &rules, actor, product, InteractionKind::Dislike))
            .await?;
        Ok(DislikeOutcome { interaction })
    }

    /// Record a superlike (with its optional proposal) atomically, then run
    /// match detection exactly as a like would.
    pub async fn superlike(&self, request: SuperlikeRequest) -> Result<SuperlikeOutcome, SwapError> {
        let rules = Arc::clone(&self.rules);
        let SuperlikeRequest {
            actor_id: actor,
            product_id: product,
            message,
            offered_product_id: offered,
        } = request;
        let outcome = self
            .db
            .exclusive(move |conn| {
                let (interaction, proposal) = immediate(conn, |tx| {
                    ledger::record_superlike(tx, &rules, actor, product, &message, offered)
                })?;
                let matched =
                    immediate(conn, |tx| detector::check_and_create_match(tx, actor, product))?;
                Ok(SuperlikeOutcome {
                    interaction,
                    proposal,
                    matched,
                })
            })
            .await?;
        if let Some(matched) = &outcome.matched {
            info!(match_id = %matched.id, actor = %actor, "superlike completed a match");
        }
        Ok(outcome)
    }

    pub async fn interaction_kind(
        &self,
        actor: UserId,
        product: ProductId,
    ) -> Result<Option<InteractionKind>, SwapError> {
        self.db
            .read(move |conn| ledger::query_interaction(conn, actor, product))
            .await
    }

    pub async fn undo(&self, actor: UserId, product: ProductId) -> Result<Interaction, SwapError> {
        self.db
            .write(move |tx| ledger::undo(tx, actor, product))
            .await
    }

    pub async fn product_stats(&self, product: ProductId) -> Result<ProductStats, SwapError> {
        self.db
            .read(move |conn| ledger::product_stats(conn, product))
            .await
    }

    pub async fn likes_given(&self, actor: UserId) -> Result<Vec<Interaction>, SwapError> {
        self.db.read(move |conn| ledger::likes_given(conn, actor)).await
    }

    pub async fn superlikes_sent(&self, actor: UserId) -> Result<Vec<SentSuperlike>, SwapError> {
        self.db
            .read(move |conn| ledger::superlikes_sent(conn, actor))
            .await
    }

    pub async fn superlikes_received(
        &self,
        owner: UserId,
    ) -> Result<Vec<ReceivedSuperlike>, SwapError> {
        self.db
            .read(move |conn| ledger::superlikes_received(conn, owner))
            .await
    }

    pub async fn potential_matches(&self, actor: UserId) -> Result<Vec<PotentialMatch>, SwapError> {
        self.db
            .read(move |conn| ledger::potential_matches(conn, actor))
            .await
    }

    // --- Proposals ---

    pub async fn proposals_for_product(
        &self,
        product: ProductId,
        actor: UserId,
    ) -> Result<Vec<ProposalDetails>, SwapError> {
        self.db
            .read(move |conn| proposals::list_for_product(conn, product, actor))
            .await
    }

    // --- Match store ---

    pub async fn list_matches(&self, user: UserId) -> Result<Vec<MatchListing>, SwapError> {
        self.db.read(move |conn| store::list_matches(conn, user)).await
    }

    /// The match as seen by `user`; `NotFound` unless `user` participates.
    pub async fn get_match(&self, user: UserId, id: MatchId) -> Result<MatchListing, SwapError> {
        self.db
            .read(move |conn| {
                let record = store::get_match(conn, user, id)?;
                store::listing(conn, user, &record)
            })
            .await
    }

    // --- Feed ---

    pub async fn swipe_feed(
        &self,
        viewer: UserId,
        category: Option<CategoryId>,
    ) -> Result<Vec<ProductSummary>, SwapError> {
        self.db
            .read(move |conn| feed::swipe_feed(conn, viewer, category))
            .await
    }

    // --- Conversations ---

    pub async fn post_message(
        &self,
        sender: UserId,
        match_id: MatchId,
        content: impl Into<String>,
    ) -> Result<MessageRecord, SwapError> {
        let content = content.into();
        self.db
            .write(move |tx| conversations::post_message(tx, sender, match_id, &content))
            .await
    }

    pub async fn conversation(
        &self,
        viewer: UserId,
        match_id: MatchId,
    ) -> Result<Conversation, SwapError> {
        self.db
            .read(move |conn| conversations::conversation(conn, viewer, match_id))
            .await
    }

    // --- Catalog ---

    pub async fn register_user(&self, user: NewUser) -> Result<UserSummary, SwapError> {
        self.db
            .write(move |tx| catalog::register_user(tx, &user))
            .await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<ProductSummary, SwapError> {
        self.db
            .write(move |tx| catalog::create_product(tx, &product))
            .await
    }

    pub async fn delete_product(&self, owner: UserId, product: ProductId) -> Result<(), SwapError> {
        let rules = Arc::clone(&self.rules);
        self.db
            .write(move |tx| catalog::delete_product(tx, &rules, owner, product))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, SwapError> {
        self.db.read(catalog::list_categories).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use swapmatch_core::{Entity, PairKey};

    async fn engine() -> Matchmaker {
        let db = Database::open_in_memory().await.unwrap();
        Matchmaker::new(db, MatchingConfig::default())
    }

    async fn member(engine: &Matchmaker, name: &str) -> UserId {
        engine
            .register_user(NewUser {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn listing(engine: &Matchmaker, owner: UserId, name: &str) -> ProductId {
        engine
            .create_product(NewProduct {
                owner_id: owner,
                name: name.to_string(),
                description: format!("a {name}"),
                price: Decimal::new(2500, 2),
                category_id: CategoryId(1),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn mutual_likes_match_once() {
        let engine = engine().await;
        let u1 = member(&engine, "U1").await;
        let u2 = member(&engine, "U2").await;
        let a = listing(&engine, u1, "A").await;
        let b = listing(&engine, u2, "B").await;

        let first = engine.like(u1, b).await.unwrap();
        assert_eq!(first.interaction.kind, InteractionKind::Like);
        assert!(first.matched.is_none());

        let second = engine.like(u2, a).await.unwrap();
        let matched = second.matched.unwrap();
        assert_eq!(matched.pair, PairKey::new(u1, u2));

        let for_u1 = engine.list_matches(u1).await.unwrap();
        let for_u2 = engine.list_matches(u2).await.unwrap();
        assert_eq!(for_u1.len(), 1);
        assert_eq!(for_u1[0].id, for_u2[0].id);
        assert_eq!(for_u1[0].your_product.id, a);
        assert_eq!(for_u2[0].your_product.id, b);
    }

    #[tokio::test]
    async fn failed_offer_leaves_no_trace() {
        let engine = engine().await;
        let u1 = member(&engine, "U1").await;
        let u2 = member(&engine, "U2").await;
        let a = listing(&engine, u1, "A").await;
        let b = listing(&engine, u2, "B").await;

        let request = |offered| SuperlikeRequest {
            actor_id: u1,
            product_id: b,
            message: "interested!".to_string(),
            offered_product_id: Some(offered),
        };

        let err = engine.superlike(request(ProductId(9_999))).await.unwrap_err();
        assert!(matches!(
            err,
            SwapError::NotFound {
                entity: Entity::OfferedProduct,
                ..
            }
        ));
        assert_eq!(engine.interaction_kind(u1, b).await.unwrap(), None);
        assert!(engine.proposals_for_product(b, u1).await.unwrap().is_empty());

        let outcome = engine.superlike(request(a)).await.unwrap();
        assert_eq!(outcome.proposal.unwrap().offered_product.id, a);
        assert_eq!(engine.proposals_for_product(b, u1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn proposal_insert_failure_rolls_back_superlike() {
        use swapmatch_storage::database::sql_err;

        let engine = engine().await;
        let u1 = member(&engine, "U1").await;
        let u2 = member(&engine, "U2").await;
        let a = listing(&engine, u1, "A").await;
        let b = listing(&engine, u2, "B").await;

        engine
            .database()
            .write(|tx| {
                tx.execute_batch(
                    "CREATE TRIGGER reject_proposals BEFORE INSERT ON proposals
                     BEGIN SELECT RAISE(ABORT, 'proposals unavailable'); END;",
                )
                .map_err(sql_err)
            })
            .await
            .unwrap();

        let request = SuperlikeRequest {
            actor_id: u1,
            product_id: b,
            message: "swap?".to_string(),
            offered_product_id: Some(a),
        };
        let err = engine.superlike(request.clone()).await.unwrap_err();
        assert!(matches!(err, SwapError::Storage { .. }), "{err:?}");
        assert_eq!(engine.interaction_kind(u1, b).await.unwrap(), None);
        assert!(engine.superlikes_sent(u1).await.unwrap().is_empty());

        engine
            .database()
            .write(|tx| {
                tx.execute_batch("DROP TRIGGER reject_proposals;")
                    .map_err(sql_err)
            })
            .await
            .unwrap();

        let outcome = engine.superlike(request).await.unwrap();
        assert_eq!(outcome.proposal.unwrap().offered_product.id, a);
        assert_eq!(
            engine.interaction_kind(u1, b).await.unwrap(),
            Some(InteractionKind::Superlike)
        );
    }

    #[tokio::test]
    async fn get_match_guards_participation() {
        let engine = engine().await;
        let u1 = member(&engine, "U1").await;
        let u2 = member(&engine, "U2").await;
        let u3 = member(&engine, "U3").await;
        let a = listing(&engine, u1, "A").await;
        let b = listing(&engine, u2, "B").await;
        engine.like(u1, b).await.unwrap();
        let id = engine.like(u2, a).await.unwrap().matched.unwrap().id;

        assert_eq!(engine.get_match(u1, id).await.unwrap().other_user.id, u2);
        assert!(matches!(
            engine.get_match(u3, id).await,
            Err(SwapError::NotFound {
                entity: Entity::Match,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn categories_are_available() {
        let engine = engine().await;
        assert_eq!(engine.categories().await.unwrap().len(), 13);
    }
}
