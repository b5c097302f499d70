//! REST API routes for the roster service.
//!
//! Two read-only endpoints:
//! - `GET /projects` lists projects visible to the token.
//! - `GET /roster/{project_id}?since=<RFC3339>&include=assignee` lists the
//!   people active on a project.

use crate::error::AppError;
use crate::models::{Identity, Project};
use crate::services::roster::{default_since, Roster};
use crate::services::source::MergeRequestSource;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

impl ApiErr {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Authentication { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── State and query parameters ───────────────────────────────────────────────

/// Shared state for the roster routes.
pub struct RosterState<S> {
    pub roster: Arc<Roster<S>>,
}

impl<S> Clone for RosterState<S> {
    fn clone(&self) -> Self {
        Self {
            roster: Arc::clone(&self.roster),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterQuery {
    since: Option<String>,
    include: Option<String>,
}

/// Recency cutoff from the `since` parameter.
///
/// A missing or unparseable value falls back to the default lookback.
pub fn parse_since(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    match raw.map(DateTime::parse_from_rfc3339) {
        Some(Ok(since)) => since.with_timezone(&Utc),
        Some(Err(e)) => {
            log::debug!("[api] Ignoring unparseable since parameter: {}", e);
            default_since(now)
        }
        None => default_since(now),
    }
}

/// Whether the comma-separated `include` list asks for assignees.
pub fn includes_assignee(raw: Option<&str>) -> bool {
    raw.unwrap_or_default()
        .split(',')
        .any(|item| item.trim() == "assignee")
}

fn parse_project_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::invalid_input_field(
            format!("project id must be an integer, got {:?}", raw),
            "project_id",
        )
    })
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the roster API routes.
pub fn roster_api_routes<S>() -> Router<RosterState<S>>
where
    S: MergeRequestSource + 'static,
{
    Router::new()
        .route("/projects", get(get_projects::<S>))
        .route("/roster/{project_id}", get(get_roster::<S>))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /projects - every project visible to the token.
async fn get_projects<S>(
    State(state): State<RosterState<S>>,
) -> Result<Json<Vec<Project>>, ApiErr>
where
    S: MergeRequestSource + 'static,
{
    let projects = state.roster.list_all_projects().await.map_err(|e| {
        log::error!("[api] Failed to list projects: {}", e);
        e
    })?;

    Ok(Json(projects))
}

/// GET /roster/:project_id - unique identities active on a project.
async fn get_roster<S>(
    State(state): State<RosterState<S>>,
    Path(project_id): Path<String>,
    Query(params): Query<RosterQuery>,
) -> Result<Json<Vec<Identity>>, ApiErr>
where
    S: MergeRequestSource + 'static,
{
    let project_id = parse_project_id(&project_id)?;
    let since = parse_since(params.since.as_deref(), Utc::now());
    let include_assignee = includes_assignee(params.include.as_deref());

    let identities = state
        .roster
        .get_roster(project_id, since, include_assignee)
        .await
        .map_err(|e| {
            log::error!("[api] Failed to build roster for project {}: {}", project_id, e);
            e
        })?;

    Ok(Json(identities))
}
