//! Classification of rejected interaction responses.

use thiserror::Error;

use crate::error::AppError;

/// Discord JSON error code for "Request entity too large".
pub const ENTITY_TOO_LARGE_CODE: isize = 40005;

/// Discord field-level error code reported when a string exceeds its maximum length.
pub const BASE_TYPE_MAX_LENGTH: &str = "BASE_TYPE_MAX_LENGTH";

/// Why Discord refused to accept an edited interaction response.
///
/// The two size-related variants need different fallback replies, so they are
/// told apart from the platform's reported error kind rather than treating every
/// failed send the same.
#[derive(Error, Debug)]
pub enum SendError {
    /// The text of the message exceeds a structural length limit.
    #[error("Message content exceeds Discord's length limit")]
    ContentTooLong,

    /// The combined size of the attachments exceeds Discord's upload limit.
    #[error("Request entity too large")]
    EntityTooLarge,

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] AppError),
}

impl SendError {
    /// Classifies a rejected request from its HTTP status, top-level JSON error code
    /// and the codes of any nested field errors.
    ///
    /// # Arguments
    /// - `status` - HTTP status code of the response
    /// - `code` - Discord JSON error code
    /// - `field_codes` - Codes of the per-field errors Discord attached
    /// - `source` - The original error, kept when the failure is not size-related
    pub fn classify<'a>(
        status: u16,
        code: isize,
        field_codes: impl IntoIterator<Item = &'a str>,
        source: AppError,
    ) -> Self {
        if field_codes.into_iter().any(|c| c == BASE_TYPE_MAX_LENGTH) {
            Self::ContentTooLong
        } else if code == ENTITY_TOO_LARGE_CODE || status == 413 {
            Self::EntityTooLarge
        } else {
            Self::Other(source)
        }
    }
}

impl From<serenity::Error> for SendError {
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;

        let rejection = match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => Some((
                response.status_code.as_u16(),
                response.error.code,
                response
                    .error
                    .errors
                    .iter()
                    .map(|e| e.code.clone())
                    .collect::<Vec<String>>(),
            )),
            _ => None,
        };

        match rejection {
            Some((status, code, field_codes)) => Self::classify(
                status,
                code,
                field_codes.iter().map(String::as_str),
                AppError::from(err),
            ),
            None => Self::Other(AppError::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other() -> AppError {
        AppError::InternalError("send failed".to_string())
    }

    /// Tests that a nested max-length field error is classified as content too long.
    ///
    /// Expected: SendError::ContentTooLong even though the status is a plain 400
    #[test]
    fn max_length_field_error_is_content_too_long() {
        let err = SendError::classify(400, 50035, ["BASE_TYPE_MAX_LENGTH"], other());
        assert!(matches!(err, SendError::ContentTooLong));
    }

    /// Tests that Discord's entity-too-large code is classified as such.
    ///
    /// Expected: SendError::EntityTooLarge
    #[test]
    fn code_40005_is_entity_too_large() {
        let err = SendError::classify(400, 40005, [], other());
        assert!(matches!(err, SendError::EntityTooLarge));
    }

    /// Tests that a bare HTTP 413 without a JSON body still counts as too large.
    ///
    /// Expected: SendError::EntityTooLarge
    #[test]
    fn status_413_is_entity_too_large() {
        let err = SendError::classify(413, -1, [], other());
        assert!(matches!(err, SendError::EntityTooLarge));
    }

    /// Tests that unrelated failures keep the original error.
    ///
    /// Expected: SendError::Other
    #[test]
    fn unrelated_failure_is_other() {
        let err = SendError::classify(403, 50013, ["SOME_OTHER_CODE"], other());
        assert!(matches!(err, SendError::Other(_)));
    }
}
