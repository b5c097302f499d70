//! Roster aggregation.
//!
//! Answers "who is actively working on project P": everyone who authored
//! (and optionally is assigned to) an open merge request, or one merged or
//! closed after the recency cutoff. Every call re-crawls GitLab; nothing is
//! cached between requests.

use crate::error::AppError;
use crate::models::{Identity, MergeRequestRef, MergeRequestState, Project};
use crate::services::gitlab_client::MergeRequestsQuery;
use crate::services::pagination::{
    crawl_since, fetch_all_pages, CONVERGENCE_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::services::source::MergeRequestSource;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// How far back merged/closed history is scanned when no cutoff is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 15;

/// Default recency cutoff relative to `now`.
pub fn default_since(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(DEFAULT_LOOKBACK_DAYS)
}

/// Identities contributed by a single merge request.
///
/// Always the author; the assignee too when requested and actually set.
pub fn extract_identities(mr: &MergeRequestRef, include_assignee: bool) -> Vec<Identity> {
    let mut identities = vec![mr.author.clone()];

    if include_assignee {
        if let Some(assignee) = mr.assignee.as_ref().filter(|a| a.is_set()) {
            identities.push(assignee.clone());
        }
    }

    identities
}

/// Collapse identities to one per username.
///
/// The last record seen for a username wins. Output order is unspecified.
pub fn dedup_identities(identities: impl IntoIterator<Item = Identity>) -> Vec<Identity> {
    let by_username: HashMap<String, Identity> = identities
        .into_iter()
        .map(|identity| (identity.username.clone(), identity))
        .collect();

    by_username.into_values().collect()
}

/// Roster service over a merge request source.
///
/// Holds no per-request state, so one instance can serve concurrent calls.
pub struct Roster<S> {
    source: S,
}

impl<S: MergeRequestSource> Roster<S> {
    /// Create a roster backed by `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// List every project visible to the token.
    pub async fn list_all_projects(&self) -> Result<Vec<Project>, AppError> {
        let source = &self.source;
        let projects = fetch_all_pages("projects", |page| source.list_projects(page, MAX_PAGE_SIZE))
            .await?;

        log::info!("[roster] Listed {} projects", projects.len());
        Ok(projects.into_iter().map(Project::from).collect())
    }

    /// Unique identities active on `project_id` since `since`.
    ///
    /// Any failed fetch fails the whole call; partial rosters are never
    /// returned.
    pub async fn get_roster(
        &self,
        project_id: i64,
        since: DateTime<Utc>,
        include_assignee: bool,
    ) -> Result<Vec<Identity>, AppError> {
        let (open, merged, closed) = tokio::try_join!(
            self.list_open_merge_requests(project_id),
            self.list_merge_requests_since(project_id, since, MergeRequestState::Merged),
            self.list_merge_requests_since(project_id, since, MergeRequestState::Closed),
        )?;

        log::debug!(
            "[roster] Project {}: {} open, {} merged, {} closed merge requests since {}",
            project_id,
            open.len(),
            merged.len(),
            closed.len(),
            since.to_rfc3339()
        );

        let identities = open
            .iter()
            .chain(&merged)
            .chain(&closed)
            .flat_map(|mr| extract_identities(mr, include_assignee));
        let roster = dedup_identities(identities);

        log::info!(
            "[roster] Project {}: {} active identities",
            project_id,
            roster.len()
        );
        Ok(roster)
    }

    /// Open merge requests, all pages at the maximum page size.
    async fn list_open_merge_requests(
        &self,
        project_id: i64,
    ) -> Result<Vec<MergeRequestRef>, AppError> {
        let label = format!("project {} opened", project_id);
        let source = &self.source;
        fetch_all_pages(&label, |page| {
            let query = MergeRequestsQuery {
                state: Some(MergeRequestState::Opened.to_string()),
                page: Some(page),
                per_page: Some(MAX_PAGE_SIZE),
                ..Default::default()
            };
            async move {
                source
                    .list_merge_requests(project_id, &query)
                    .await
                    .map(|response| response.map(MergeRequestRef::from))
            }
        })
        .await
    }

    /// Merged or closed merge requests updated strictly after `since`.
    async fn list_merge_requests_since(
        &self,
        project_id: i64,
        since: DateTime<Utc>,
        state: MergeRequestState,
    ) -> Result<Vec<MergeRequestRef>, AppError> {
        let label = format!("project {} {}", project_id, state);
        let source = &self.source;
        crawl_since(&label, since, |page| {
            let query = MergeRequestsQuery {
                state: Some(state.to_string()),
                order_by: Some("updated_at".to_string()),
                sort: Some("desc".to_string()),
                page: Some(page),
                per_page: Some(CONVERGENCE_PAGE_SIZE),
            };
            async move {
                source
                    .list_merge_requests(project_id, &query)
                    .await
                    .map(|response| response.map(MergeRequestRef::from))
            }
        })
        .await
    }
}
