//! Serenity implementations of the service ports.
//!
//! Serenity objects are converted into core-owned models here and nowhere else.

pub mod channel;
pub mod interaction;
pub mod message;
pub mod user;

pub use channel::SerenityChannelPoster;
pub use interaction::InteractionResponder;
pub use message::SerenityMessageSource;
