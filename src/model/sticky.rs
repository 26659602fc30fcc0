use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted sticky message state.
///
/// Keys are channel IDs. JSON object keys are strings, so IDs are stored as their
/// decimal representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyState {
    /// Sticky content per channel.
    #[serde(default)]
    pub messages: HashMap<u64, String>,
    /// ID of the most recently posted copy per channel.
    #[serde(default)]
    pub previous: HashMap<u64, u64>,
}
