//! Glyfi Bot Test Utils
//!
//! Shared helpers for the bot's unit tests. The bot converts Serenity objects into
//! its own models at the Discord adapter boundary; the factories in this crate
//! build those Serenity objects from JSON shaped like Discord's API responses, so
//! the conversions can be tested without a gateway connection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_message, create_test_user, unicode_reaction};
//!
//! #[test]
//! fn converts_message() {
//!     let author = create_test_user(1, "alice", None);
//!     let message = create_test_message(10, 20, &author, vec![], vec![unicode_reaction("✅", 1)]);
//!     // Convert and assert...
//! }
//! ```

pub mod serenity;
