//! Roster identity model.

use crate::services::gitlab_client::GitLabUser;
use serde::{Deserialize, Serialize};

/// A person derived from merge request authorship or assignment.
///
/// Two identities with the same `username` are the same person, whatever
/// their other fields say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name (e.g., "Alice Liddell").
    pub name: String,

    /// GitLab username, the uniqueness key.
    pub username: String,

    /// Avatar image URL; empty when GitLab has none.
    pub avatar_url: String,
}

impl Identity {
    /// Whether this identity carries a usable handle.
    ///
    /// GitLab can hand back an assignee object with an empty username.
    pub fn is_set(&self) -> bool {
        !self.username.is_empty()
    }
}

impl From<GitLabUser> for Identity {
    fn from(user: GitLabUser) -> Self {
        Self {
            name: user.name,
            username: user.username,
            avatar_url: user.avatar_url.unwrap_or_default(),
        }
    }
}
