//! Test factories for Serenity API objects.
//!
//! Every factory deserializes a JSON payload with the fields Discord sends, so the
//! resulting structs are exactly what Serenity would hand to the bot.
//!
//! # Available Factories
//!
//! - `user::create_test_user` - Users with an optional avatar hash
//! - `attachment::create_test_attachment` - Message attachments on the CDN
//! - `message::create_test_message` - Guild messages with attachments and reactions
//! - `message::unicode_reaction` / `message::custom_reaction` - Reaction payloads
//! - `role::create_test_role` - Guild roles

pub mod attachment;
pub mod message;
pub mod role;
pub mod user;

pub use attachment::create_test_attachment;
pub use message::{create_test_message, custom_reaction, unicode_reaction};
pub use role::create_test_role;
pub use user::create_test_user;
