//! Extraction of submissions from a sequence of messages.

use crate::{
    error::AppError,
    model::{emoji::EmojiRef, message::MessageRef, submission::SubmissionIndex},
};

use super::source::MessageSource;

/// Finds messages their own author marked as a submission.
pub struct SubmissionFilter<'a> {
    source: &'a dyn MessageSource,
}

impl<'a> SubmissionFilter<'a> {
    pub fn new(source: &'a dyn MessageSource) -> Self {
        Self { source }
    }

    /// Collects the attachments of every message whose author reacted to it with
    /// the marker emoji.
    ///
    /// Messages without attachments are skipped without any request. For messages
    /// carrying the marker reaction, the reacting users are fetched; a reaction by
    /// anyone but the author does not count. Each qualifying message increments the
    /// submission message count once and contributes all of its attachments, in
    /// message order. The input messages are not modified.
    ///
    /// # Arguments
    /// - `channel_id` - Channel the messages belong to
    /// - `messages` - Messages to scan, in history order
    /// - `marker` - The configured submission marker emoji
    ///
    /// # Returns
    /// - `Ok(SubmissionIndex)` - Submissions per author and the message count
    /// - `Err(AppError)` - Fetching the reacting users failed
    pub async fn filter(
        &self,
        channel_id: u64,
        messages: &[MessageRef],
        marker: &EmojiRef,
    ) -> Result<SubmissionIndex, AppError> {
        let mut index = SubmissionIndex::new();

        for message in messages {
            if !message.has_attachments() {
                continue;
            }

            // Query with the emoji as it appears on the message; a custom emoji may
            // have been renamed since it was configured.
            let Some(reaction) = message.reactions.iter().find(|r| *r == marker) else {
                continue;
            };

            let users = self
                .source
                .reaction_users(channel_id, message.id, reaction)
                .await?;

            if users.contains(&message.author.id) {
                index.record_message(&message.author, &message.attachments);
            }
        }

        Ok(index)
    }
}
