use serde::{Deserialize, Serialize};
use std::fmt;

/// The guild role allowed to run moderator commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    /// Discord role ID
    pub id: u64,
    /// Role name at the time it was configured
    pub name: String,
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@&{}>", self.id)
    }
}
