//! In-memory merge request source for testing.
//!
//! Not every helper is used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use gitlab_roster::error::AppError;
use gitlab_roster::services::gitlab_client::{
    GitLabMergeRequest, GitLabProject, GitLabUser, MergeRequestsQuery, PageCursor,
    PaginatedResponse, PaginationInfo,
};
use gitlab_roster::services::MergeRequestSource;
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `list_merge_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMrCall {
    pub project_id: i64,
    pub state: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

/// Call record for `list_projects`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProjectsCall {
    pub page: u32,
    pub per_page: u32,
}

/// Simple mock source that paginates canned data like GitLab does.
///
/// Features:
/// - Pages sliced by the requested `per_page`
/// - `x-next-page` set while more data remains
/// - Call tracking for page-count assertions
/// - Error injection per merge request state
#[derive(Default)]
pub struct MockSource {
    projects: Mutex<Vec<GitLabProject>>,
    merge_requests: Mutex<HashMap<(i64, String), Vec<GitLabMergeRequest>>>,
    // Call tracking
    list_projects_calls: Mutex<Vec<ListProjectsCall>>,
    list_mr_calls: Mutex<Vec<ListMrCall>>,
    // Error injection
    error_on_state: Mutex<Option<(String, String)>>,
    error_on_projects: Mutex<Option<String>>,
    malformed_next_page: Mutex<bool>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project.
    pub fn add_project(&self, id: i64, name: &str, name_with_namespace: &str) {
        self.projects.lock().unwrap().push(GitLabProject {
            id,
            name: name.to_string(),
            name_with_namespace: name_with_namespace.to_string(),
        });
    }

    /// Add a merge request. Merged/closed MRs must be added newest first.
    pub fn add_merge_request(&self, project_id: i64, mr: GitLabMergeRequest) {
        self.merge_requests
            .lock()
            .unwrap()
            .entry((project_id, mr.state.clone()))
            .or_default()
            .push(mr);
    }

    // === Error injection methods ===

    /// Make `list_merge_requests` fail for MRs in `state`
    pub fn fail_state(&self, state: &str, msg: &str) {
        *self.error_on_state.lock().unwrap() = Some((state.to_string(), msg.to_string()));
    }

    /// Make `list_projects` fail
    pub fn fail_projects(&self, msg: &str) {
        *self.error_on_projects.lock().unwrap() = Some(msg.to_string());
    }

    /// Send a garbage `x-next-page` instead of a page number
    pub fn send_malformed_next_page(&self) {
        *self.malformed_next_page.lock().unwrap() = true;
    }

    // === Call inspection ===

    pub fn list_projects_calls(&self) -> Vec<ListProjectsCall> {
        self.list_projects_calls.lock().unwrap().clone()
    }

    pub fn list_mr_calls(&self) -> Vec<ListMrCall> {
        self.list_mr_calls.lock().unwrap().clone()
    }

    /// Calls made for MRs in `state`
    pub fn calls_for_state(&self, state: &str) -> Vec<ListMrCall> {
        self.list_mr_calls()
            .into_iter()
            .filter(|c| c.state.as_deref() == Some(state))
            .collect()
    }

    fn paginate<T: Clone>(&self, items: &[T], page: u32, per_page: u32) -> PaginatedResponse<T> {
        let per_page = per_page.max(1) as usize;
        let start = (page.saturating_sub(1) as usize) * per_page;
        let data: Vec<T> = items.iter().skip(start).take(per_page).cloned().collect();
        let has_more = start + per_page < items.len();

        let next_page = if !has_more {
            PageCursor::End
        } else if *self.malformed_next_page.lock().unwrap() {
            PageCursor::Malformed("next".to_string())
        } else {
            PageCursor::Next(page + 1)
        };

        PaginatedResponse {
            data,
            pagination: PaginationInfo {
                page,
                per_page: per_page as u32,
                total: items.len() as u32,
                next_page,
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl MergeRequestSource for MockSource {
    async fn list_projects(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PaginatedResponse<GitLabProject>, AppError> {
        self.list_projects_calls
            .lock()
            .unwrap()
            .push(ListProjectsCall { page, per_page });

        if let Some(msg) = self.error_on_projects.lock().unwrap().clone() {
            return Err(AppError::gitlab_api_full(msg, 500, "/projects"));
        }

        let projects = self.projects.lock().unwrap().clone();
        Ok(self.paginate(&projects, page, per_page))
    }

    async fn list_merge_requests(
        &self,
        project_id: i64,
        query: &MergeRequestsQuery,
    ) -> Result<PaginatedResponse<GitLabMergeRequest>, AppError> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(20);
        self.list_mr_calls.lock().unwrap().push(ListMrCall {
            project_id,
            state: query.state.clone(),
            order_by: query.order_by.clone(),
            sort: query.sort.clone(),
            page,
            per_page,
        });

        let state = query.state.clone().unwrap_or_default();
        if let Some((failing, msg)) = self.error_on_state.lock().unwrap().clone() {
            if failing == state {
                return Err(AppError::network(msg));
            }
        }

        let items = self
            .merge_requests
            .lock()
            .unwrap()
            .get(&(project_id, state))
            .cloned()
            .unwrap_or_default();
        Ok(self.paginate(&items, page, per_page))
    }
}

/// Build a GitLab user.
pub fn user(username: &str) -> GitLabUser {
    GitLabUser {
        username: username.to_string(),
        name: format!("{} (name)", username),
        avatar_url: Some(format!("https://gitlab.example.com/avatars/{}.png", username)),
    }
}

/// Build a GitLab merge request.
pub fn merge_request(
    state: &str,
    updated_at: &str,
    author: &str,
    assignee: Option<&str>,
) -> GitLabMergeRequest {
    GitLabMergeRequest {
        state: state.to_string(),
        updated_at: updated_at.to_string(),
        author: user(author),
        assignee: assignee.map(user),
    }
}
