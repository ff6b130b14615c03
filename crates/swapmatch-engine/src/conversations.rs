// SPDX-FileCopyrightText: 2026 Swapmatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat between the two participants of a match.

use rusqlite::Connection;
use swapmatch_core::{
    Conversation, ConversationMessage, MatchId, MessageRecord, SwapError, UserId,
};
use swapmatch_storage::queries::messages;
use tracing::debug;

use crate::store;

pub const MAX_MESSAGE_CHARS: usize = 2000;

pub fn post_message(
    conn: &Connection,
    sender: UserId,
    match_id: MatchId,
    content: &str,
) -> Result<MessageRecord, SwapError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(SwapError::validation("content", "must not be empty"));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(SwapError::validation(
            "content",
            format!("must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }
    store::get_match(conn, sender, match_id)?;
    let message = messages::insert_message(conn, match_id, sender, content)?;
    debug!(match_id = %match_id, sender = %sender, message = %message.id, "message posted");
    Ok(message)
}

/// The match as seen by `viewer` plus every message, oldest first.
pub fn conversation(
    conn: &Connection,
    viewer: UserId,
    match_id: MatchId,
) -> Result<Conversation, SwapError> {
    let record = store::get_match(conn, viewer, match_id)?;
    let details = store::details(conn, &record)?;
    let match_view = store::listing(conn, viewer, &record)?;
    let messages = messages::list_for_match(conn, match_id)?
        .into_iter()
        .map(|message| {
            let sender = if message.sender_id == details.user_low.id {
                details.user_low.clone()
            } else {
                details.user_high.clone()
            };
            ConversationMessage {
                id: message.id,
                content: message.content,
                created_at: message.created_at,
                from_you: message.sender_id == viewer,
                sender,
            }
        })
        .collect();
    Ok(Conversation {
        match_view,
        messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{conn, product, user};
    use swapmatch_core::{Entity, PairKey};
    use swapmatch_storage::queries::matches;

    #[test]
    fn participants_chat_and_outsiders_cannot() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let caio = user(&conn, "Caio");
        let lamp = product(&conn, ana, "lamp");
        let bike = product(&conn, bia, "bike");
        let record = matches::insert(&conn, PairKey::new(ana, bia), lamp, bike)
            .unwrap()
            .unwrap();

        post_message(&conn, ana, record.id, "  still have the bike?  ").unwrap();
        post_message(&conn, bia, record.id, "yes").unwrap();
        assert!(matches!(
            post_message(&conn, caio, record.id, "me too"),
            Err(SwapError::NotFound {
                entity: Entity::Match,
                ..
            })
        ));

        let thread = conversation(&conn, bia, record.id).unwrap();
        assert_eq!(thread.match_view.other_user.id, ana);
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages[0].content, "still have the bike?");
        assert_eq!(thread.messages[0].sender.id, ana);
        assert!(!thread.messages[0].from_you);
        assert!(thread.messages[1].from_you);
    }

    #[test]
    fn content_length_is_bounded() {
        let conn = conn();
        let ana = user(&conn, "Ana");
        let bia = user(&conn, "Bia");
        let lamp = product(&conn, ana, "lamp");
        let bike = product(&conn, bia, "bike");
        let record = matches::insert(&conn, PairKey::new(ana, bia), lamp, bike)
            .unwrap()
            .unwrap();

        assert!(post_message(&conn, ana, record.id, "   ").is_err());
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            post_message(&conn, ana, record.id, &long),
            Err(SwapError::Validation { field: "content", .. })
        ));
        post_message(&conn, ana, record.id, &"x".repeat(MAX_MESSAGE_CHARS)).unwrap();
    }
}
