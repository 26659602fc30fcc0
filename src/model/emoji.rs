//! Marker emoji representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An emoji as seen on a reaction or configured as the submission marker.
///
/// Custom guild emoji are identified by their snowflake ID; the name is only kept
/// for display. Standard Unicode emoji have no ID and are identified by the symbol
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmojiRef {
    /// Guild custom emoji.
    Custom {
        /// Discord emoji ID
        id: u64,
        /// Emoji name as shown in `:name:` form
        name: String,
        /// Whether the emoji is animated
        #[serde(default)]
        animated: bool,
    },
    /// Standard Unicode emoji.
    Unicode {
        /// The emoji symbol
        name: String,
    },
}

impl EmojiRef {
    pub fn custom(id: u64, name: impl Into<String>) -> Self {
        Self::Custom {
            id,
            name: name.into(),
            animated: false,
        }
    }

    pub fn unicode(name: impl Into<String>) -> Self {
        Self::Unicode { name: name.into() }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Custom { id, .. } => Some(*id),
            Self::Unicode { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Custom { name, .. } | Self::Unicode { name } => name,
        }
    }
}

/// Two emoji are equal when both carry IDs and the IDs match, or when neither
/// carries an ID and the names match. A custom emoji never equals a Unicode one.
impl PartialEq for EmojiRef {
    fn eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name() == other.name(),
            _ => false,
        }
    }
}

impl Eq for EmojiRef {}

impl fmt::Display for EmojiRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom {
                id,
                name,
                animated: true,
            } => write!(f, "<a:{}:{}>", name, id),
            Self::Custom { id, name, .. } => write!(f, "<:{}:{}>", name, id),
            Self::Unicode { name } => f.write_str(name),
        }
    }
}
