//! GitLab API client.
//!
//! Provides HTTP client for GitLab API v4 with authentication and pagination.

use crate::error::AppError;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// GitLab API client configuration.
#[derive(Debug, Clone)]
pub struct GitLabClientConfig {
    /// Base URL of the GitLab instance (e.g., `https://gitlab.com`).
    pub base_url: String,

    /// Personal access token for authentication.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitLabClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// GitLab API client.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    config: GitLabClientConfig,
}

/// Continuation cursor read from the `x-next-page` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageCursor {
    /// Another page exists.
    Next(u32),

    /// No further pages (header missing or empty).
    #[default]
    End,

    /// Header present but not a usable page number.
    Malformed(String),
}

impl PageCursor {
    /// Interpret a raw `x-next-page` header value.
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(raw) = value.map(str::trim) else {
            return Self::End;
        };

        if raw.is_empty() {
            return Self::End;
        }

        match raw.parse::<u32>() {
            Ok(page) if page > 0 => Self::Next(page),
            _ => Self::Malformed(raw.to_string()),
        }
    }
}

/// Pagination information from GitLab API response headers.
#[derive(Debug, Clone, Default)]
pub struct PaginationInfo {
    /// Current page number.
    pub page: u32,

    /// Number of items per page.
    pub per_page: u32,

    /// Total number of pages.
    pub total_pages: u32,

    /// Total number of items.
    pub total: u32,

    /// Cursor for the next page.
    pub next_page: PageCursor,

    /// Previous page number (if any).
    pub prev_page: Option<u32>,
}

/// Paginated response from GitLab API.
#[derive(Debug)]
pub struct PaginatedResponse<T> {
    /// The response data.
    pub data: Vec<T>,

    /// Pagination information.
    pub pagination: PaginationInfo,
}

impl<T> PaginatedResponse<T> {
    /// Convert every item, keeping the pagination info.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Query parameters for listing a project's merge requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequestsQuery {
    /// Filter by state: `opened`, `merged`, `closed`, `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Sort field: `created_at` or `updated_at`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Sort direction: `asc` or `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Page number for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Number of items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// GitLab merge request from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabMergeRequest {
    pub state: String,
    #[serde(default)]
    pub updated_at: String,
    pub author: GitLabUser,
    pub assignee: Option<GitLabUser>,
}

/// GitLab user from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub avatar_url: Option<String>,
}

/// GitLab project from API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabProject {
    pub id: i64,
    pub name: String,
    pub name_with_namespace: String,
}

impl GitLabClient {
    /// Create a new GitLab client.
    pub fn new(config: GitLabClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        // Add the private token header for authentication
        let token_value = header::HeaderValue::from_str(&config.token)
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        headers.insert("PRIVATE-TOKEN", token_value);

        // Build the HTTP client
        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the base URL for API requests.
    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v4{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    /// Parse pagination headers from response.
    fn parse_pagination(response: &Response) -> PaginationInfo {
        let headers = response.headers();

        let get_header = |name: &str| -> Option<u32> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
        };

        PaginationInfo {
            page: get_header("x-page").unwrap_or(1),
            per_page: get_header("x-per-page").unwrap_or(20),
            total_pages: get_header("x-total-pages").unwrap_or(1),
            total: get_header("x-total").unwrap_or(0),
            next_page: PageCursor::from_header(
                headers.get("x-next-page").and_then(|v| v.to_str().ok()),
            ),
            prev_page: get_header("x-prev-page"),
        }
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            // The deadline also covers reading the body.
            response.json::<T>().await.map_err(|e| {
                if e.is_decode() {
                    AppError::internal(format!("Failed to parse response: {}", e))
                } else {
                    AppError::from(e)
                }
            })
        } else if status == StatusCode::UNAUTHORIZED {
            Err(AppError::authentication(
                "GitLab token rejected. Check the configured access token.",
            ))
        } else {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let body_message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    // GitLab returns errors as {"message": "..."} or {"error": "..."}
                    v.get("message").or_else(|| v.get("error")).map(|m| {
                        m.as_str()
                            .map(ToString::to_string)
                            // Sometimes "message" is an object like {"base":["msg"]}
                            .unwrap_or_else(|| m.to_string())
                    })
                });

            let message = match (status, &body_message) {
                (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
                (_, Some(msg)) => msg.clone(),
                _ => format!("Request failed ({}): {}", status_code, body),
            };

            Err(AppError::gitlab_api_full(message, status_code, endpoint))
        }
    }

    /// Make a GET request with pagination support.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&impl Serialize>,
    ) -> Result<PaginatedResponse<T>, AppError> {
        let url = self.api_url(endpoint);

        let mut request = self.client.get(&url);
        if let Some(q) = query {
            request = request.query(q);
        }

        let response = request.send().await?;
        let pagination = Self::parse_pagination(&response);
        let data = self.handle_response::<Vec<T>>(response, endpoint).await?;

        log::debug!(
            "[gitlab] GET {} page {}: {} items, next {:?}",
            endpoint,
            pagination.page,
            data.len(),
            pagination.next_page
        );
        Ok(PaginatedResponse { data, pagination })
    }

    /// List one page of projects visible to the token.
    pub async fn list_projects(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<PaginatedResponse<GitLabProject>, AppError> {
        self.get_paginated("/projects", Some(&[("page", page), ("per_page", per_page)]))
            .await
    }

    /// List one page of a project's merge requests.
    ///
    /// GitLab answers 404 for projects that do not exist or are not visible
    /// to the token; that surfaces as [`AppError::NotFound`].
    pub async fn list_merge_requests(
        &self,
        project_id: i64,
        query: &MergeRequestsQuery,
    ) -> Result<PaginatedResponse<GitLabMergeRequest>, AppError> {
        let endpoint = format!("/projects/{}/merge_requests", project_id);
        self.get_paginated(&endpoint, Some(query))
            .await
            .map_err(|e| match e.remote_status() {
                Some(404) => AppError::not_found_with_id("Project", project_id.to_string()),
                _ => e,
            })
    }
}
