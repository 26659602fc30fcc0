use serenity::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::{
    error::{lookup::LookupError, AppError},
    model::{
        emoji::EmojiRef,
        message::{AttachmentRef, AuthorRef, MessageRef},
    },
};

use super::{download::AttachmentFetcher, source::MessageSource};

mod filter;

/// In-memory channel history.
///
/// Pages are capped at `page_size` regardless of the requested limit so that
/// pagination is exercised with small fixtures.
pub struct FakeHistory {
    pub messages: Vec<MessageRef>,
    /// Reacting user IDs per message ID (for the marker emoji).
    pub reactors: HashMap<u64, Vec<u64>>,
    pub page_size: usize,
    pub page_requests: AtomicUsize,
    pub reaction_requests: AtomicUsize,
}

impl FakeHistory {
    pub fn new(messages: Vec<MessageRef>) -> Self {
        Self {
            messages,
            reactors: HashMap::new(),
            page_size: 100,
            page_requests: AtomicUsize::new(0),
            reaction_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_reactors(mut self, message_id: u64, users: Vec<u64>) -> Self {
        self.reactors.insert(message_id, users);
        self
    }
}

#[async_trait]
impl MessageSource for FakeHistory {
    async fn message(&self, _channel_id: u64, message_id: u64) -> Result<MessageRef, LookupError> {
        self.messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or(LookupError::NotFound)
    }

    async fn messages_after(
        &self,
        _channel_id: u64,
        cursor: u64,
        limit: u8,
    ) -> Result<Vec<MessageRef>, AppError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        let mut page: Vec<MessageRef> = self
            .messages
            .iter()
            .filter(|m| m.id > cursor)
            .cloned()
            .collect();
        page.sort_by_key(|m| m.id);
        page.truncate(self.page_size.min(limit as usize));
        Ok(page)
    }

    async fn reaction_users(
        &self,
        _channel_id: u64,
        message_id: u64,
        _emoji: &EmojiRef,
    ) -> Result<Vec<u64>, AppError> {
        self.reaction_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.reactors.get(&message_id).cloned().unwrap_or_default())
    }
}

/// Serves attachment bytes from memory; unknown URLs fail.
#[derive(Default)]
pub struct FakeFetcher {
    pub files: HashMap<String, Vec<u8>>,
}

impl FakeFetcher {
    pub fn with_file(mut self, url: &str, data: &[u8]) -> Self {
        self.files.insert(url.to_string(), data.to_vec());
        self
    }
}

#[async_trait]
impl AttachmentFetcher for FakeFetcher {
    async fn fetch_into(&self, url: &str, file: &mut File) -> Result<(), AppError> {
        let data = self
            .files
            .get(url)
            .ok_or_else(|| AppError::NotFound(format!("No such attachment: {}", url)))?;
        file.write_all(data).await?;
        Ok(())
    }
}

pub fn marker() -> EmojiRef {
    EmojiRef::unicode("✅")
}

pub fn plain_message(id: u64, author: &AuthorRef) -> MessageRef {
    MessageRef {
        id,
        author: author.clone(),
        reactions: Vec::new(),
        attachments: Vec::new(),
    }
}

pub fn marked_message(id: u64, author: &AuthorRef, files: &[&str]) -> MessageRef {
    MessageRef {
        id,
        author: author.clone(),
        reactions: vec![marker()],
        attachments: files
            .iter()
            .map(|f| AttachmentRef::new(format!("https://cdn.test/{}/{}", id, f), *f))
            .collect(),
    }
}
