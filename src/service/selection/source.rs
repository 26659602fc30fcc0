//! Access to a channel's message history.

use serenity::async_trait;

use crate::{
    error::{lookup::LookupError, AppError},
    model::{emoji::EmojiRef, message::MessageRef},
};

/// Read access to Discord messages, expressed in core-owned types.
///
/// Implemented over Serenity's HTTP client by
/// [`SerenityMessageSource`](crate::data::discord::SerenityMessageSource).
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Looks up a single message in a channel.
    ///
    /// # Returns
    /// - `Ok(MessageRef)` - The message exists in the channel and is readable
    /// - `Err(LookupError)` - The message could not be resolved
    async fn message(&self, channel_id: u64, message_id: u64) -> Result<MessageRef, LookupError>;

    /// Fetches one page of messages with IDs strictly greater than `cursor`.
    ///
    /// Implementations return the page in ascending ID order. An empty page means
    /// the end of the channel history has been reached.
    async fn messages_after(
        &self,
        channel_id: u64,
        cursor: u64,
        limit: u8,
    ) -> Result<Vec<MessageRef>, AppError>;

    /// Lists the IDs of every user who reacted to a message with `emoji`.
    async fn reaction_users(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &EmojiRef,
    ) -> Result<Vec<u64>, AppError>;
}
