//! Sticky messages: a message the bot keeps at the bottom of a channel.
//!
//! Whenever someone else posts in a channel with a sticky message, the previous
//! copy is deleted and the content is posted again.

use serenity::async_trait;
use tokio::sync::Mutex;

use crate::{
    data::sticky::StickyRepository,
    error::AppError,
    model::sticky::StickyState,
};

/// Posting and deleting plain channel messages.
///
/// Implemented over Serenity by
/// [`SerenityChannelPoster`](crate::data::discord::SerenityChannelPoster).
#[async_trait]
pub trait ChannelPoster: Send + Sync {
    /// Posts `content` and returns the new message ID.
    async fn post(&self, channel_id: u64, content: &str) -> Result<u64, AppError>;

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), AppError>;
}

/// Sticky message registrations and the last posted copy per channel.
pub struct StickyService {
    state: Mutex<StickyState>,
    repo: StickyRepository,
}

impl StickyService {
    /// Loads the persisted registrations.
    pub async fn load(repo: StickyRepository) -> Result<Self, AppError> {
        let state = repo.load().await?;
        tracing::info!("Loaded {} sticky message(s)", state.messages.len());

        Ok(Self {
            state: Mutex::new(state),
            repo,
        })
    }

    /// Registers (or replaces) the sticky message of a channel and posts it.
    pub async fn enable(
        &self,
        poster: &dyn ChannelPoster,
        channel_id: u64,
        content: &str,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;

        state.messages.insert(channel_id, content.to_string());
        self.repo.save_messages(&state.messages).await?;

        self.repost(&mut state, poster, channel_id).await
    }

    /// Removes the sticky message of a channel and deletes its last copy.
    pub async fn disable(&self, poster: &dyn ChannelPoster, channel_id: u64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;

        state.messages.remove(&channel_id);
        self.repo.save_messages(&state.messages).await?;

        if let Some(previous) = state.previous.remove(&channel_id) {
            delete_previous(poster, channel_id, previous).await;
            self.repo.save_previous(&state.previous).await?;
        }

        Ok(())
    }

    /// Reposts the sticky message after a message by someone other than the bot.
    ///
    /// # Arguments
    /// - `channel_id` - Channel the message was posted in
    /// - `author_id` - Author of the new message
    /// - `bot_id` - The bot's own user ID
    pub async fn on_message(
        &self,
        poster: &dyn ChannelPoster,
        channel_id: u64,
        author_id: u64,
        bot_id: u64,
    ) -> Result<(), AppError> {
        if author_id == bot_id {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if !state.messages.contains_key(&channel_id) {
            return Ok(());
        }

        self.repost(&mut state, poster, channel_id).await
    }

    /// Sticky content of a channel, if registered.
    pub async fn content(&self, channel_id: u64) -> Option<String> {
        self.state.lock().await.messages.get(&channel_id).cloned()
    }

    async fn repost(
        &self,
        state: &mut StickyState,
        poster: &dyn ChannelPoster,
        channel_id: u64,
    ) -> Result<(), AppError> {
        let Some(content) = state.messages.get(&channel_id).cloned() else {
            return Ok(());
        };

        if let Some(previous) = state.previous.remove(&channel_id) {
            delete_previous(poster, channel_id, previous).await;
        }

        let posted = poster.post(channel_id, &content).await?;
        state.previous.insert(channel_id, posted);
        self.repo.save_previous(&state.previous).await?;

        tracing::debug!("Reposted sticky message {} in channel {}", posted, channel_id);
        Ok(())
    }
}

/// The copy may already have been removed by a moderator; that is not an error.
async fn delete_previous(poster: &dyn ChannelPoster, channel_id: u64, message_id: u64) {
    if let Err(e) = poster.delete(channel_id, message_id).await {
        tracing::warn!(
            "Failed to delete previous sticky message {} in channel {}: {}",
            message_id,
            channel_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex as StdMutex;

    const BOT: u64 = 1;
    const CHANNEL: u64 = 50;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Post(u64, String),
        Delete(u64, u64),
    }

    #[derive(Default)]
    struct RecordingPoster {
        next_id: AtomicU64,
        ops: StdMutex<Vec<Op>>,
    }

    impl RecordingPoster {
        fn ops(&self) -> Vec<Op> {
            self.ops.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelPoster for RecordingPoster {
        async fn post(&self, channel_id: u64, content: &str) -> Result<u64, AppError> {
            let id = 100 + self.next_id.fetch_add(1, Ordering::SeqCst);
            self.ops.lock().unwrap().push(Op::Post(channel_id, content.to_string()));
            Ok(id)
        }

        async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
            self.ops.lock().unwrap().push(Op::Delete(channel_id, message_id));
            Ok(())
        }
    }

    /// Tests the enable, repost, disable cycle.
    ///
    /// Expected: each repost deletes the previous copy, disable deletes the last one
    #[tokio::test]
    async fn reposts_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let service = StickyService::load(StickyRepository::new(tmp.path())).await.unwrap();
        let poster = RecordingPoster::default();

        service.enable(&poster, CHANNEL, "Be nice").await.unwrap();
        service.on_message(&poster, CHANNEL, 2, BOT).await.unwrap();
        service.disable(&poster, CHANNEL).await.unwrap();

        assert_eq!(
            poster.ops(),
            vec![
                Op::Post(CHANNEL, "Be nice".to_string()),
                Op::Delete(CHANNEL, 100),
                Op::Post(CHANNEL, "Be nice".to_string()),
                Op::Delete(CHANNEL, 101),
            ]
        );
        assert_eq!(service.content(CHANNEL).await, None);
    }

    /// Tests that the bot's own messages and unregistered channels are ignored.
    ///
    /// Expected: no posts or deletions
    #[tokio::test]
    async fn ignores_own_messages_and_other_channels() {
        let tmp = tempfile::tempdir().unwrap();
        let service = StickyService::load(StickyRepository::new(tmp.path())).await.unwrap();
        let poster = RecordingPoster::default();

        service.enable(&poster, CHANNEL, "Hi").await.unwrap();
        let before = poster.ops().len();

        service.on_message(&poster, CHANNEL, BOT, BOT).await.unwrap();
        service.on_message(&poster, 999, 2, BOT).await.unwrap();

        assert_eq!(poster.ops().len(), before);
    }

    /// Tests that registrations survive a restart.
    ///
    /// Expected: a reloaded service reposts and deletes the copy posted before
    #[tokio::test]
    async fn state_survives_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let poster = RecordingPoster::default();
        {
            let service = StickyService::load(StickyRepository::new(tmp.path())).await.unwrap();
            service.enable(&poster, CHANNEL, "Persisted").await.unwrap();
        }

        let reloaded = StickyService::load(StickyRepository::new(tmp.path())).await.unwrap();
        reloaded.on_message(&poster, CHANNEL, 2, BOT).await.unwrap();

        assert_eq!(reloaded.content(CHANNEL).await.as_deref(), Some("Persisted"));
        assert_eq!(poster.ops()[1], Op::Delete(CHANNEL, 100));
    }
}
