//! Paginated crawls over GitLab list endpoints.
//!
//! Two strategies:
//! - [`fetch_all_pages`] follows `x-next-page` until GitLab stops sending it.
//! - [`crawl_since`] walks merge requests sorted by `updated_at` descending and
//!   stops as soon as a page reaches the recency cutoff.

use crate::error::AppError;
use crate::models::{MergeRequestRef, TimestampOutcome};
use crate::services::gitlab_client::{PageCursor, PaginatedResponse};
use chrono::{DateTime, Utc};
use std::future::Future;

/// Largest page size GitLab accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size for time-windowed crawls; small pages keep overshoot low.
pub const CONVERGENCE_PAGE_SIZE: u32 = 20;

/// Resolve the page to fetch after `current`, or `None` to stop.
///
/// A malformed cursor ends the crawl like a missing one, but is logged since
/// it may hide results GitLab meant to send.
fn next_page(label: &str, current: u32, cursor: &PageCursor) -> Option<u32> {
    match cursor {
        PageCursor::Next(next) if *next > current => Some(*next),
        PageCursor::Next(next) => {
            log::warn!(
                "[pagination] {}: next page {} does not advance past {}, stopping",
                label,
                next,
                current
            );
            None
        }
        PageCursor::End => None,
        PageCursor::Malformed(raw) => {
            log::warn!(
                "[pagination] {}: malformed x-next-page {:?} after page {}, treating as last page",
                label,
                raw,
                current
            );
            None
        }
    }
}

/// Fetch every page, starting at page 1, and concatenate the items.
///
/// Any fetch error aborts the crawl; no partial result is returned.
pub async fn fetch_all_pages<T, F, Fut>(label: &str, mut fetch: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_data = Vec::new();
    let mut page = 1u32;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch(page).await?;
        pages_fetched += 1;
        all_data.extend(response.data);

        match next_page(label, page, &response.pagination.next_page) {
            Some(next) => page = next,
            None => break,
        }
    }

    log::debug!(
        "[pagination] {}: fetched {} items over {} pages",
        label,
        all_data.len(),
        pages_fetched
    );
    Ok(all_data)
}

/// Fetch merge requests updated strictly after `cutoff`.
///
/// `fetch` must return pages ordered by `updated_at` descending. The crawl
/// stops after the first page whose oldest item is not after the cutoff
/// (an unparseable timestamp counts as "not after"), on an empty page, or
/// when there is no next page. Later pages are never requested.
pub async fn crawl_since<F, Fut>(
    label: &str,
    cutoff: DateTime<Utc>,
    mut fetch: F,
) -> Result<Vec<MergeRequestRef>, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<MergeRequestRef>, AppError>>,
{
    let mut kept = Vec::new();
    let mut page = 1u32;
    let mut pages_fetched = 0u32;

    loop {
        let PaginatedResponse { data, pagination } = fetch(page).await?;
        pages_fetched += 1;

        let Some(oldest) = data.last() else {
            break;
        };
        let reached_cutoff = match oldest.updated_at() {
            TimestampOutcome::Absent => {
                log::warn!(
                    "[pagination] {}: oldest merge request on page {} has no updated_at, stopping",
                    label,
                    page
                );
                true
            }
            ts => !ts.is_after(cutoff),
        };

        for mr in data {
            match mr.updated_at() {
                TimestampOutcome::Malformed(raw) => {
                    log::warn!(
                        "[pagination] {}: skipping merge request with malformed updated_at {:?}",
                        label,
                        raw
                    );
                }
                ts if ts.is_after(cutoff) => kept.push(mr),
                _ => {}
            }
        }

        if reached_cutoff {
            break;
        }

        match next_page(label, page, &pagination.next_page) {
            Some(next) => page = next,
            None => break,
        }
    }

    log::debug!(
        "[pagination] {}: kept {} merge requests after {} over {} pages",
        label,
        kept.len(),
        cutoff.to_rfc3339(),
        pages_fetched
    );
    Ok(kept)
}
