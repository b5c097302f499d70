//! GitLab project model.

use crate::services::gitlab_client::GitLabProject;
use serde::{Deserialize, Serialize};

/// Snapshot of a GitLab project as exposed by `/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// GitLab project ID.
    pub id: i64,

    /// Short project name (e.g., "GitLab").
    pub name: String,

    /// Full namespaced name with spaces removed (e.g., "GitLab.org/GitLab").
    pub name_with_namespace: String,
}

impl From<GitLabProject> for Project {
    fn from(project: GitLabProject) -> Self {
        Self {
            id: project.id,
            name: project.name,
            name_with_namespace: project.name_with_namespace.replace(' ', ""),
        }
    }
}
