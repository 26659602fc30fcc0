//! Failures when resolving a message ID supplied by a user.

use thiserror::Error;

use crate::error::AppError;

/// Why a message ID could not be resolved in the invoking channel.
///
/// Every variant except `Other` is the user's problem (wrong ID, wrong channel,
/// missing access) and is reported back to them instead of failing the command.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not Found (in this channel)")]
    NotFound,

    #[error("Bad Request")]
    BadRequest,

    #[error("Server Error")]
    ServerError,

    #[error(transparent)]
    Other(#[from] AppError),
}

impl LookupError {
    /// Maps an HTTP status of a failed lookup to its kind.
    pub fn from_status(status: u16, source: AppError) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            400 => Self::BadRequest,
            500..=599 => Self::ServerError,
            _ => Self::Other(source),
        }
    }

    /// Message shown to the user for a failed lookup of `message_id`, or `None`
    /// when the failure is not something the user caused.
    pub fn user_message(&self, message_id: u64) -> Option<String> {
        match self {
            Self::Other(_) => None,
            kind => Some(format!("Message ID `{}`: {}", message_id, kind)),
        }
    }
}

impl From<serenity::Error> for LookupError {
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;

        let status = match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
                Some(response.status_code.as_u16())
            }
            _ => None,
        };

        match status {
            Some(status) => Self::from_status(status, AppError::from(err)),
            None => Self::Other(AppError::from(err)),
        }
    }
}
