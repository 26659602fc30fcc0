//! Application state shared by all event handlers.
//!
//! The state is built once during startup and cloned into the bot's event handler.
//! Every field is cheap to clone: stores and services share their data through
//! `Arc`.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    config::DataPaths,
    data::{http::HttpFetcher, settings::SettingStore},
    model::{emoji::EmojiRef, role::RoleRef},
    service::sticky::StickyService,
};

#[derive(Clone)]
pub struct AppState {
    /// Directories below the data directory.
    pub paths: DataPaths,

    /// Downloads attachments, avatars and Typst archives.
    pub http: HttpFetcher,

    /// Emoji that marks a message as a submission.
    pub emoji: SettingStore<EmojiRef>,

    /// Role allowed to run moderator commands.
    pub role: SettingStore<RoleRef>,

    /// Sticky message registrations.
    pub sticky: Arc<StickyService>,

    /// Serializes Typst installation across commands.
    pub typst_gate: Arc<Mutex<()>>,

    /// Cron expression of the presence rotation.
    pub status_rotation_cron: String,

    /// Set once the presence rotation has been started; `ready` fires again on
    /// every reconnect.
    pub status_started: Arc<AtomicBool>,
}
