/// A user whose profile picture can be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAvatar {
    pub id: u64,
    pub username: String,
    /// Avatar hash; `None` when the user has the default avatar. Animated avatars
    /// start with `a_`.
    pub avatar_hash: Option<String>,
}

impl UserAvatar {
    pub fn is_animated(&self) -> bool {
        self.avatar_hash
            .as_deref()
            .is_some_and(|hash| hash.starts_with("a_"))
    }
}
