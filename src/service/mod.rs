//! Business logic of the bot commands.
//!
//! Services operate on core-owned models and on the port traits they define
//! (`MessageSource`, `AttachmentFetcher`, `Responder`, `ChannelPoster`). The bot
//! layer wires the Serenity and reqwest adapters from `data` into them.

pub mod archive;
pub mod auth;
pub mod pfps;
pub mod response;
pub mod selection;
pub mod settings;
pub mod showcase;
pub mod sticky;
pub mod typst;
