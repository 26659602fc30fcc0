//! Persistence and platform adapters.
//!
//! - `settings` / `sticky` - JSON files under the data directory
//! - `discord` - Serenity implementations of the service ports
//! - `http` - reqwest downloads

pub mod discord;
pub mod http;
pub mod settings;
pub mod sticky;
