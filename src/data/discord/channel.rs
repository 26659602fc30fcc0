use serenity::all::{ChannelId, CreateMessage, MessageId};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{error::AppError, service::sticky::ChannelPoster};

/// Posts and deletes plain messages with the bot's HTTP client.
pub struct SerenityChannelPoster {
    http: Arc<Http>,
}

impl SerenityChannelPoster {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChannelPoster for SerenityChannelPoster {
    async fn post(&self, channel_id: u64, content: &str) -> Result<u64, AppError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await?;

        Ok(message.id.get())
    }

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
        self.http
            .delete_message(ChannelId::new(channel_id), MessageId::new(message_id), None)
            .await?;

        Ok(())
    }
}
