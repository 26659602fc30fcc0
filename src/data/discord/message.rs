use serenity::all::{ChannelId, EmojiId, GetMessages, Message, MessageId, ReactionType, UserId};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{
    error::{lookup::LookupError, AppError},
    model::{
        emoji::EmojiRef,
        message::{AttachmentRef, AuthorRef, MessageRef},
    },
    service::selection::source::MessageSource,
};

/// Maximum number of users Discord returns per reaction page.
const REACTION_PAGE_SIZE: u8 = 100;

/// Reads channel history through Discord's REST API.
pub struct SerenityMessageSource {
    http: Arc<Http>,
}

impl SerenityMessageSource {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSource for SerenityMessageSource {
    async fn message(&self, channel_id: u64, message_id: u64) -> Result<MessageRef, LookupError> {
        if message_id == 0 {
            return Err(LookupError::NotFound);
        }

        let message = ChannelId::new(channel_id)
            .message(&self.http, MessageId::new(message_id))
            .await?;

        Ok(message_ref(&message))
    }

    async fn messages_after(
        &self,
        channel_id: u64,
        cursor: u64,
        limit: u8,
    ) -> Result<Vec<MessageRef>, AppError> {
        // Snowflakes are never zero; every real message lies after ID 1.
        let after = MessageId::new(cursor.max(1));

        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().after(after).limit(limit))
            .await?;

        let mut page: Vec<MessageRef> = messages.iter().map(message_ref).collect();
        page.sort_by_key(|m| m.id);

        Ok(page)
    }

    async fn reaction_users(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &EmojiRef,
    ) -> Result<Vec<u64>, AppError> {
        let channel = ChannelId::new(channel_id);
        let message = MessageId::new(message_id);
        let mut ids = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let users = channel
                .reaction_users(
                    &self.http,
                    message,
                    reaction_type(emoji),
                    Some(REACTION_PAGE_SIZE),
                    after,
                )
                .await?;

            let count = users.len();
            ids.extend(users.iter().map(|u| u.id.get()));
            after = users.last().map(|u| u.id);

            if count < REACTION_PAGE_SIZE as usize || after.is_none() {
                break;
            }
        }

        Ok(ids)
    }
}

/// Converts a Serenity message into the core model.
pub fn message_ref(message: &Message) -> MessageRef {
    MessageRef {
        id: message.id.get(),
        author: AuthorRef::new(message.author.id.get(), message.author.name.clone()),
        reactions: message
            .reactions
            .iter()
            .filter_map(|r| emoji_ref(&r.reaction_type))
            .collect(),
        attachments: message
            .attachments
            .iter()
            .map(|a| {
                let filename = if a.filename.is_empty() {
                    a.id.to_string()
                } else {
                    a.filename.clone()
                };
                AttachmentRef::new(a.url.clone(), filename)
            })
            .collect(),
    }
}

/// Converts a reaction emoji; unknown kinds are skipped.
pub fn emoji_ref(reaction: &ReactionType) -> Option<EmojiRef> {
    match reaction {
        ReactionType::Custom { animated, id, name } => Some(EmojiRef::Custom {
            id: id.get(),
            name: name.clone().unwrap_or_default(),
            animated: *animated,
        }),
        ReactionType::Unicode(symbol) => Some(EmojiRef::unicode(symbol.clone())),
        _ => None,
    }
}

pub fn reaction_type(emoji: &EmojiRef) -> ReactionType {
    match emoji {
        EmojiRef::Custom { id, name, animated } => ReactionType::Custom {
            animated: *animated,
            id: EmojiId::new(*id),
            name: Some(name.clone()),
        },
        EmojiRef::Unicode { name } => ReactionType::Unicode(name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::serenity::{
        attachment::create_test_attachment,
        message::{create_test_message, custom_reaction, unicode_reaction},
        user::create_test_user,
    };

    /// Tests converting a message with reactions and attachments.
    ///
    /// Expected: IDs, author name, reactions and attachments carried over in order
    #[test]
    fn converts_messages() {
        let author = create_test_user(11, "alice", None);
        let message = create_test_message(
            500,
            9,
            &author,
            vec![
                create_test_attachment(1, "art.png"),
                create_test_attachment(2, "sketch.jpg"),
            ],
            vec![unicode_reaction("✅", 2), custom_reaction(77, "glyph", true, 1)],
        );

        let converted = message_ref(&message);

        assert_eq!(converted.id, 500);
        assert_eq!(converted.author, AuthorRef::new(11, "alice"));
        assert_eq!(
            converted.reactions,
            vec![EmojiRef::unicode("✅"), EmojiRef::custom(77, "glyph")]
        );
        let names: Vec<&str> = converted.attachments.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, ["art.png", "sketch.jpg"]);
        assert!(converted.attachments[0].url.ends_with("/art.png"));
    }

    /// Tests the file name fallback for attachments without a name.
    ///
    /// Expected: the attachment ID is used as the file name
    #[test]
    fn empty_attachment_name_falls_back_to_id() {
        let author = create_test_user(11, "alice", None);
        let message = create_test_message(500, 9, &author, vec![create_test_attachment(42, "")], vec![]);

        assert_eq!(message_ref(&message).attachments[0].filename, "42");
    }

    /// Tests converting marker emoji to reaction types and back.
    ///
    /// Expected: custom and unicode emoji survive the round trip, animation kept
    #[test]
    fn reaction_types_convert_both_ways() {
        let custom = EmojiRef::Custom {
            id: 77,
            name: "glyph".to_string(),
            animated: true,
        };
        let unicode = EmojiRef::unicode("🎨");

        assert_eq!(emoji_ref(&reaction_type(&custom)), Some(custom.clone()));
        assert_eq!(emoji_ref(&reaction_type(&unicode)), Some(unicode));
        assert!(matches!(
            reaction_type(&custom),
            ReactionType::Custom { animated: true, .. }
        ));
    }
}
