use crate::error::internal::InternalError;

/// Parses a u64 value from a string, e.g. a Discord snowflake typed into a command
/// option.
///
/// Surrounding whitespace is ignored.
///
/// # Arguments
/// - `value` - The string to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed string to `u64`
/// - `Err(InternalError::ParseStringId)` - Failed to parse the string as a u64
pub fn parse_u64_from_string(value: &str) -> Result<u64, InternalError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId {
            value: value.to_string(),
            source: e,
        })
}

/// Extracts a user ID from a mention (`<@123>`, `<@!123>`) or a bare ID.
pub fn parse_user_mention(value: &str) -> Option<u64> {
    let id = value
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_start_matches('@')
        .trim_start_matches('!');

    parse_u64_from_string(id).ok()
}
