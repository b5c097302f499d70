//! Seam between the roster core and GitLab.
//!
//! The core only ever reads two paginated collections. Keeping them behind a
//! trait lets one client be shared by every request and lets tests count
//! exactly which pages were fetched.

use crate::error::AppError;
use crate::services::gitlab_client::{
    GitLabClient, GitLabMergeRequest, GitLabProject, MergeRequestsQuery, PaginatedResponse,
};
use async_trait::async_trait;

/// Paginated read access to projects and their merge requests.
#[async_trait]
pub trait MergeRequestSource: Send + Sync {
    /// Fetch one page of projects.
    async fn list_projects(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PaginatedResponse<GitLabProject>, AppError>;

    /// Fetch one page of a project's merge requests.
    async fn list_merge_requests(
        &self,
        project_id: i64,
        query: &MergeRequestsQuery,
    ) -> Result<PaginatedResponse<GitLabMergeRequest>, AppError>;
}

#[async_trait]
impl MergeRequestSource for GitLabClient {
    async fn list_projects(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PaginatedResponse<GitLabProject>, AppError> {
        GitLabClient::list_projects(self, page, per_page).await
    }

    async fn list_merge_requests(
        &self,
        project_id: i64,
        query: &MergeRequestsQuery,
    ) -> Result<PaginatedResponse<GitLabMergeRequest>, AppError> {
        GitLabClient::list_merge_requests(self, project_id, query).await
    }
}
