//! Snapshot types for chat messages fetched from a channel's history.

use crate::model::emoji::EmojiRef;

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorRef {
    /// Discord user ID.
    pub id: u64,
    /// Discord username, used to name files in the flat layout.
    pub name: String,
}

impl AuthorRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Chat markup that pings this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Remote download location.
    pub url: String,
    /// File name as uploaded; the attachment ID when Discord omits a name.
    pub filename: String,
}

impl AttachmentRef {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Immutable snapshot of a message, as far as the selection pipeline cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Discord message ID (snowflake, increases with time).
    pub id: u64,
    /// Message author.
    pub author: AuthorRef,
    /// Distinct emoji that have been reacted to the message.
    pub reactions: Vec<EmojiRef>,
    /// Attachments in upload order.
    pub attachments: Vec<AttachmentRef>,
}

impl MessageRef {
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
