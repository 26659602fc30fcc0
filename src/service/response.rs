//! Final reply of the download commands.
//!
//! Builds the ephemeral reply out of a short statistics block and a (possibly
//! long) listing, keeps the message under Discord's 2000 character limit by moving
//! the listing into a text file when needed, and falls back to shorter replies when
//! Discord rejects the upload.

use serenity::async_trait;
use std::path::Path;

use crate::{
    error::send::SendError,
    model::reply::{Reply, ReplyAttachment},
};

/// Combined length of stats and listing at which the listing moves into a file.
pub const INLINE_LIMIT: usize = 1950;

/// Reply used when Discord rejects the message text itself.
pub const BUG_REPORT_MESSAGE: &str = "Message was too long to fit. Please file a bug report and paste the _exact_ command you used into it: <https://github.com/glyphs-fi/GlyfiBot/issues/new>";

/// Appended to the stats when the archive exceeded Discord's upload limit.
pub const ARCHIVE_TOO_LARGE_NOTE: &str = "Archive ended up being too big for Discord...\nI'm afraid you'll have to collect the files manually.";

/// Edits the deferred response of an interaction.
///
/// Implemented over Serenity by
/// [`InteractionResponder`](crate::data::discord::InteractionResponder).
#[async_trait]
pub trait Responder: Send + Sync {
    async fn edit(&self, reply: Reply) -> Result<(), SendError>;
}

/// What ended up being shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The full reply, including any archive, was accepted.
    Delivered,
    /// The archive was too large; stats were sent with a note instead.
    ArchiveTooLarge,
    /// The text was rejected; the bug report message was sent instead.
    ContentTooLong,
    /// The reply failed for another reason and was only logged.
    Failed,
}

/// Assembles and sends stats + listing replies.
pub struct ResponseAssembler {
    /// File name of the text attachment used for long listings.
    listing_file_name: String,
}

impl ResponseAssembler {
    pub fn new(listing_file_name: impl Into<String>) -> Self {
        Self {
            listing_file_name: listing_file_name.into(),
        }
    }

    /// Builds the reply without sending it.
    ///
    /// If `stats` and `listing` together reach [`INLINE_LIMIT`] characters, `stats`
    /// becomes the message and `listing` a text attachment; otherwise both are sent
    /// inline separated by a newline. `attachment` (usually the archive) is added
    /// as a further file.
    pub fn assemble(&self, stats: &str, listing: &str, attachment: Option<&Path>) -> Reply {
        let mut reply = if stats.chars().count() + listing.chars().count() >= INLINE_LIMIT {
            Reply::text(stats).with_attachment(ReplyAttachment::Bytes {
                filename: self.listing_file_name.clone(),
                data: listing.as_bytes().to_vec(),
            })
        } else {
            Reply::text(format!("{}\n{}", stats, listing))
        };

        if let Some(path) = attachment {
            reply = reply.with_attachment(ReplyAttachment::File(path.to_path_buf()));
        }

        reply
    }

    /// Sends the assembled reply, falling back on size rejections.
    ///
    /// - Too large (entity size): resend `stats` with [`ARCHIVE_TOO_LARGE_NOTE`] and
    ///   without attachments.
    /// - Too long (text length): send [`BUG_REPORT_MESSAGE`].
    /// - Anything else: log and give up.
    pub async fn send(
        &self,
        responder: &dyn Responder,
        stats: &str,
        listing: &str,
        attachment: Option<&Path>,
    ) -> SendOutcome {
        let reply = self.assemble(stats, listing, attachment);

        match responder.edit(reply).await {
            Ok(()) => SendOutcome::Delivered,
            Err(SendError::EntityTooLarge) => {
                tracing::warn!("Reply rejected as too large, resending without attachments");
                let fallback = Reply::text(format!("{}\n{}", stats, ARCHIVE_TOO_LARGE_NOTE));
                if let Err(e) = responder.edit(fallback).await {
                    tracing::error!("Failed to send archive-too-large fallback: {}", e);
                    return SendOutcome::Failed;
                }
                SendOutcome::ArchiveTooLarge
            }
            Err(SendError::ContentTooLong) => {
                tracing::error!("Reply rejected as too long");
                if let Err(e) = responder.edit(Reply::text(BUG_REPORT_MESSAGE)).await {
                    tracing::error!("Failed to send too-long fallback: {}", e);
                    return SendOutcome::Failed;
                }
                SendOutcome::ContentTooLong
            }
            Err(SendError::Other(e)) => {
                tracing::error!("Failed to send reply: {}", e);
                SendOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// Responder that records every reply and fails according to a script.
    struct ScriptedResponder {
        failures: Mutex<Vec<SendError>>,
        sent: Mutex<Vec<Reply>>,
    }

    impl ScriptedResponder {
        fn failing_with(failures: Vec<SendError>) -> Self {
            Self {
                failures: Mutex::new(failures),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Reply> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for ScriptedResponder {
        async fn edit(&self, reply: Reply) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(reply);
            let mut failures = self.failures.lock().unwrap();
            if failures.is_empty() {
                Ok(())
            } else {
                Err(failures.remove(0))
            }
        }
    }

    const STATS: &str = "Selected messages: 3\nFound submission messages: 1\nFound total submissions: 1\n";

    /// Tests that a short listing is sent inline.
    ///
    /// Expected: stats and listing joined by a newline, no attachments
    #[test]
    fn short_listing_is_inline() {
        let reply = ResponseAssembler::new("submissions.txt").assemble(STATS, "- <@1>\n", None);
        assert_eq!(reply.content, format!("{}\n- <@1>\n", STATS));
        assert!(reply.attachments.is_empty());
    }

    /// Tests that reaching the inline limit moves the listing into a text file.
    ///
    /// Expected: stats as content, listing as `submissions.txt`
    #[test]
    fn long_listing_becomes_text_attachment() {
        let listing = "x".repeat(INLINE_LIMIT - STATS.len());
        let reply = ResponseAssembler::new("submissions.txt").assemble(STATS, &listing, None);

        assert_eq!(reply.content, STATS);
        assert_eq!(
            reply.attachments,
            vec![ReplyAttachment::Bytes {
                filename: "submissions.txt".to_string(),
                data: listing.into_bytes(),
            }]
        );
    }

    /// Tests that the archive is attached after the listing file.
    ///
    /// Expected: archive path as the last attachment
    #[test]
    fn archive_is_attached() {
        let archive = Path::new("/tmp/1_flat.zip");
        let reply = ResponseAssembler::new("submissions.txt").assemble(STATS, "", Some(archive));
        assert_eq!(
            reply.attachments.last(),
            Some(&ReplyAttachment::File(archive.to_path_buf()))
        );
    }

    /// Tests the fallback when the upload is too large.
    ///
    /// Expected: second reply is stats plus the note, without attachments
    #[tokio::test]
    async fn entity_too_large_resends_stats_with_note() {
        let responder = ScriptedResponder::failing_with(vec![SendError::EntityTooLarge]);
        let outcome = ResponseAssembler::new("submissions.txt")
            .send(&responder, STATS, "- <@1>\n", Some(Path::new("/tmp/a.zip")))
            .await;

        assert_eq!(outcome, SendOutcome::ArchiveTooLarge);
        let sent = responder.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].content.starts_with(STATS));
        assert!(sent[1].content.contains(ARCHIVE_TOO_LARGE_NOTE));
        assert!(sent[1].attachments.is_empty());
    }

    /// Tests the fallback when the text is rejected as too long.
    ///
    /// Expected: second reply is the fixed bug report message
    #[tokio::test]
    async fn content_too_long_sends_bug_report_message() {
        let responder = ScriptedResponder::failing_with(vec![SendError::ContentTooLong]);
        let outcome = ResponseAssembler::new("submissions.txt")
            .send(&responder, STATS, "- <@1>\n", None)
            .await;

        assert_eq!(outcome, SendOutcome::ContentTooLong);
        assert_eq!(responder.sent()[1], Reply::text(BUG_REPORT_MESSAGE));
    }

    /// Tests that other failures are swallowed without a retry.
    ///
    /// Expected: SendOutcome::Failed after a single attempt
    #[tokio::test]
    async fn other_failures_are_not_retried() {
        let responder = ScriptedResponder::failing_with(vec![SendError::Other(
            AppError::InternalError("boom".to_string()),
        )]);
        let outcome = ResponseAssembler::new("submissions.txt")
            .send(&responder, STATS, "", None)
            .await;

        assert_eq!(outcome, SendOutcome::Failed);
        assert_eq!(responder.sent().len(), 1);
    }
}
