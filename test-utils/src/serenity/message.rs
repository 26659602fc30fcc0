//! Test factories for Serenity `Message` objects and their reactions.

use serde_json::Value;
use serenity::all::{Attachment, Message, User};

/// Creates a guild text message.
///
/// # Arguments
/// - `message_id` - Discord message ID (snowflake)
/// - `channel_id` - Channel the message was posted in
/// - `author` - Message author
/// - `attachments` - Attachments in display order
/// - `reactions` - Reaction payloads from [`unicode_reaction`] / [`custom_reaction`]
///
/// # Panics
/// - If the JSON cannot be deserialized into a Message
pub fn create_test_message(
    message_id: u64,
    channel_id: u64,
    author: &User,
    attachments: Vec<Attachment>,
    reactions: Vec<Value>,
) -> Message {
    serde_json::from_value(serde_json::json!({
        "id": message_id.to_string(),
        "channel_id": channel_id.to_string(),
        "author": author,
        "content": "",
        "timestamp": "2025-01-06T18:00:00.000000+00:00",
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": attachments,
        "embeds": [],
        "reactions": reactions,
        "pinned": false,
        "type": 0,
        "flags": 0,
        "components": [],
    }))
    .expect("Failed to create test message - invalid JSON structure")
}

/// Reaction payload for a Unicode emoji.
pub fn unicode_reaction(symbol: &str, count: u64) -> Value {
    reaction(serde_json::json!({ "id": null, "name": symbol }), count)
}

/// Reaction payload for a custom guild emoji.
pub fn custom_reaction(emoji_id: u64, name: &str, animated: bool, count: u64) -> Value {
    reaction(
        serde_json::json!({
            "id": emoji_id.to_string(),
            "name": name,
            "animated": animated,
        }),
        count,
    )
}

fn reaction(emoji: Value, count: u64) -> Value {
    serde_json::json!({
        "count": count,
        "count_details": { "burst": 0, "normal": count },
        "me": false,
        "me_burst": false,
        "burst_colors": [],
        "emoji": emoji,
    })
}
