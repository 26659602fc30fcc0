//! Outbound interaction response, independent of Serenity's builders.

use std::path::PathBuf;

/// A file to attach to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAttachment {
    /// In-memory content, e.g. a listing too long to send inline.
    Bytes {
        /// Name shown in Discord
        filename: String,
        /// File content
        data: Vec<u8>,
    },
    /// A file on disk, uploaded under its own file name.
    File(PathBuf),
}

/// Content of an (ephemeral) interaction response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub attachments: Vec<ReplyAttachment>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: ReplyAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}
