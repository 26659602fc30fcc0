//! Discord bot integration.
//!
//! The bot registers its slash commands when it connects, dispatches every
//! command interaction to the matching module in `command/`, and watches channel
//! messages to keep sticky messages at the bottom.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild, role and emoji data
//! - `GUILD_MESSAGES` - Message events for sticky messages
//! - `MESSAGE_CONTENT` - Attachments and reactions of fetched messages (privileged
//!   intent, must be enabled in the Discord Developer Portal)

pub mod command;
pub mod handler;
pub mod start;
