// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage layer, the engine, and its callers.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a registered user.
    UserId
);
id_type!(
    /// Identifier of a listed product.
    ProductId
);
id_type!(
    /// Identifier of a product category.
    CategoryId
);
id_type!(
    /// Auto-increment identifier of an interaction row.
    InteractionId
);
id_type!(
    /// Auto-increment identifier of a proposal row.
    ProposalId
);
id_type!(
    /// Auto-increment identifier of a match row.
    MatchId
);
id_type!(
    /// Identifier of a chat message attached to a match.
    MessageId
);

/// A user's one-time reaction to a product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Dislike,
    Superlike,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 3] = [
        InteractionKind::Like,
        InteractionKind::Dislike,
        InteractionKind::Superlike,
    ];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Superlike => "superlike",
        }
    }

    /// Verb used when reporting a duplicate reaction.
    pub fn past_tense(&self) -> &'static str {
        match self {
            InteractionKind::Like => "liked",
            InteractionKind::Dislike => "rejected",
            InteractionKind::Superlike => "superliked",
        }
    }

    /// Likes and superlikes count as interest for matching.
    pub fn is_positive(&self) -> bool {
        !matches!(self, InteractionKind::Dislike)
    }
}

/// Order-independent identity of a user pair: lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub low: UserId,
    pub high: UserId,
}

impl PairKey {
    pub fn new(a: UserId, b: UserId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }

    /// The counterpart of `user`, or `None` if `user` is not in the pair.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

// --- Catalog ---

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Product as returned by the product lookup: owner, price and category resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
}

// --- Ledger records ---

/// One directed reaction of a user to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub actor_id: UserId,
    pub product_id: ProductId,
    pub kind: InteractionKind,
    /// Only superlikes carry a message.
    pub message: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Counter-offer made alongside a superlike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub interaction_id: InteractionId,
    pub actor_id: UserId,
    pub offered_product_id: ProductId,
    pub requested_product_id: ProductId,
    pub created_at: String,
}

/// A proposal with its offered product resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub id: ProposalId,
    pub offered_product: ProductSummary,
    pub requested_product_id: ProductId,
    pub created_at: String,
}

/// Stored match row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub pair: PairKey,
    /// Product owned by the user whose like completed the match,
    /// liked earlier by the other participant.
    pub product1_id: ProductId,
    /// Product whose like completed the match.
    pub product2_id: ProductId,
    pub created_at: String,
}

/// A match with both participants and both products resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub id: MatchId,
    pub pair: PairKey,
    pub user_low: UserSummary,
    pub user_high: UserSummary,
    pub product1: ProductSummary,
    pub product2: ProductSummary,
    pub created_at: String,
}

/// Chat message stored against a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub match_id: MatchId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub id: MessageId,
    pub content: String,
    pub created_at: String,
    pub from_you: bool,
}

/// A match as seen by one of its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchListing {
    pub id: MatchId,
    pub other_user: UserSummary,
    pub your_product: ProductSummary,
    pub their_product: ProductSummary,
    pub created_at: String,
    pub last_message: Option<LastMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: MessageId,
    pub content: String,
    pub created_at: String,
    pub sender: UserSummary,
    pub from_you: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "match")]
    pub match_view: MatchListing,
    pub messages: Vec<ConversationMessage>,
}

// --- Operation results ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub interaction: Interaction,
    #[serde(rename = "match")]
    pub matched: Option<MatchDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislikeOutcome {
    pub interaction: Interaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperlikeRequest {
    pub actor_id: UserId,
    pub product_id: ProductId,
    pub message: String,
    pub offered_product_id: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperlikeOutcome {
    pub interaction: Interaction,
    pub proposal: Option<ProposalDetails>,
    #[serde(rename = "match")]
    pub matched: Option<MatchDetails>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    pub likes: u64,
    pub dislikes: u64,
    pub superlikes: u64,
    pub total: u64,
}

/// A superlike the actor sent, with the proposals attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentSuperlike {
    pub interaction: Interaction,
    pub product: ProductSummary,
    pub proposals: Vec<ProposalDetails>,
}

/// A superlike someone else made on one of the owner's products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedSuperlike {
    pub interaction: Interaction,
    pub from: UserSummary,
    pub product: ProductSummary,
}

/// A product the user liked and the other users who liked it too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialMatch {
    pub product: ProductSummary,
    pub interested: Vec<UserSummary>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn interaction_kind_storage_strings_parse_back() {
        for kind in InteractionKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
            assert_eq!(InteractionKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(InteractionKind::from_str("love").is_err());
    }

    #[test]
    fn only_dislike_is_negative() {
        assert!(InteractionKind::Like.is_positive());
        assert!(InteractionKind::Superlike.is_positive());
        assert!(!InteractionKind::Dislike.is_positive());
    }

    #[test]
    fn like_outcome_serializes_match_key() {
        let outcome = LikeOutcome {
            interaction: Interaction {
                id: InteractionId(1),
                actor_id: UserId(1),
                product_id: ProductId(2),
                kind: InteractionKind::Like,
                message: None,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
            matched: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["interaction"]["kind"], "like");
        assert_eq!(json["interaction"]["actor_id"], 1);
        assert!(json["match"].is_null());
    }

    #[test]
    fn pair_key_other_side() {
        let pair = PairKey::new(UserId(9), UserId(3));
        assert_eq!(pair.other(UserId(3)), Some(UserId(9)));
        assert_eq!(pair.other(UserId(9)), Some(UserId(3)));
        assert_eq!(pair.other(UserId(4)), None);
    }

    proptest! {
        #[test]
        fn pair_key_is_order_independent(a in any::<i64>(), b in any::<i64>()) {
            let forward = PairKey::new(UserId(a), UserId(b));
            let backward = PairKey::new(UserId(b), UserId(a));
            prop_assert_eq!(forward, backward);
            prop_assert!(forward.low <= forward.high);
            prop_assert!(forward.contains(UserId(a)) && forward.contains(UserId(b)));
        }
    }
}
