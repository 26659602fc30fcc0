//! Bounded, cursor-paginated retrieval of a message range.

use crate::{
    error::AppError,
    model::{message::MessageRef, selection::RangeQuery},
};

use super::source::MessageSource;

/// Maximum number of messages Discord returns per history request.
pub const PAGE_SIZE: u8 = 100;

/// Fetches every message between two IDs of a channel.
pub struct MessageRangeFetcher<'a> {
    source: &'a dyn MessageSource,
}

impl<'a> MessageRangeFetcher<'a> {
    pub fn new(source: &'a dyn MessageSource) -> Self {
        Self { source }
    }

    /// Retrieves the messages of `query` in ascending ID order, both bounds included.
    ///
    /// Pages are requested "after" a moving cursor that starts one below `start`, so
    /// the start message itself is part of the first page. With an `end` bound the
    /// scan stops as soon as the end message has been appended; without one it runs
    /// until the history is exhausted.
    ///
    /// The caller is expected to have confirmed that both boundary messages exist in
    /// the channel. Should the end message disappear in the meantime, the scan stops
    /// at the first message past it.
    ///
    /// # Arguments
    /// - `channel_id` - Channel to read
    /// - `query` - Normalized range to read
    ///
    /// # Returns
    /// - `Ok(Vec<MessageRef>)` - Messages in the range
    /// - `Err(AppError)` - A page request failed
    pub async fn fetch(
        &self,
        channel_id: u64,
        query: RangeQuery,
    ) -> Result<Vec<MessageRef>, AppError> {
        let mut messages = Vec::new();
        let mut cursor = query.start.saturating_sub(1);

        'pages: loop {
            let page = self
                .source
                .messages_after(channel_id, cursor, PAGE_SIZE)
                .await?;

            let previous_cursor = cursor;
            for message in page {
                if query.end.is_some_and(|end| message.id > end) {
                    break 'pages;
                }

                let id = message.id;
                messages.push(message);

                if query.end == Some(id) {
                    break 'pages;
                }
                cursor = id;
            }

            // Empty page (or a source that stopped advancing): end of history.
            if cursor == previous_cursor {
                break;
            }
        }

        tracing::debug!(
            "Fetched {} messages from channel {} starting at {}",
            messages.len(),
            channel_id,
            query.start
        );

        Ok(messages)
    }
}
