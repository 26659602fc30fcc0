//! Error types and user-facing failure handling.
//!
//! This module provides the bot's error hierarchy. `AppError` is the top-level error
//! type that wraps library and domain errors. `CommandError` splits failures inside a
//! slash command into problems the invoking user can fix (reported back as an ephemeral
//! message) and fatal errors that abort the invocation and are only logged.

pub mod command;
pub mod config;
pub mod internal;
pub mod lookup;
pub mod send;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic conversion so that `?` can be used across library
/// boundaries.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Unexpected internal state, usually a bug.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// HTTP client request error from reqwest (attachment and release downloads).
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Local filesystem error.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Zip archive creation or extraction error.
    #[error(transparent)]
    ZipErr(#[from] zip::result::ZipError),

    /// Malformed URL while building a download location.
    #[error(transparent)]
    UrlErr(#[from] url::ParseError),

    /// Settings file (de)serialization error.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// A blocking task panicked or was cancelled.
    #[error(transparent)]
    JoinErr(#[from] tokio::task::JoinError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid input error.
    ///
    /// # Fields
    /// - Message describing what was invalid about the input
    #[error("{0}")]
    BadRequest(String),

    /// Internal error with custom message.
    ///
    /// # Fields
    /// - Detailed error message for logging
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
