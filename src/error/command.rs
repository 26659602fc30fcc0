//! Outcome of a single slash command invocation.

use thiserror::Error;

use crate::error::AppError;

/// Failure of a slash command invocation.
///
/// Validation steps return `CommandError::User` when the invoking user supplied
/// something unusable (bad message ID, no marker emoji configured, ...). The
/// interaction handler reports these verbatim as an ephemeral message. Everything
/// else is `Fatal`: it is logged and the user only sees a generic failure notice.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Problem the user can fix; the message is shown to them as-is.
    #[error("{0}")]
    User(String),

    /// Unrecoverable failure for this invocation.
    #[error(transparent)]
    Fatal(#[from] AppError),
}

impl CommandError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}

impl From<serenity::Error> for CommandError {
    fn from(err: serenity::Error) -> Self {
        Self::Fatal(AppError::from(err))
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::Fatal(AppError::from(err))
    }
}
