//! Merge request model.

use crate::models::Identity;
use crate::services::gitlab_client::GitLabMergeRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    Opened,
    Merged,
    Closed,
    Locked,
    /// Any state this service does not know about.
    Unknown,
}

impl From<&str> for MergeRequestState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "opened" => Self::Opened,
            "merged" => Self::Merged,
            "closed" => Self::Closed,
            "locked" => Self::Locked,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Merged => write!(f, "merged"),
            Self::Closed => write!(f, "closed"),
            Self::Locked => write!(f, "locked"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of reading a merge request's `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampOutcome {
    /// A valid RFC 3339 instant.
    Valid(DateTime<Utc>),

    /// GitLab sent no timestamp.
    Absent,

    /// GitLab sent something that is not RFC 3339.
    Malformed(String),
}

impl TimestampOutcome {
    /// Parse an RFC 3339 timestamp string.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Absent;
        }

        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Self::Valid(ts.with_timezone(&Utc)),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }

    /// Whether this timestamp lies strictly after `cutoff`.
    ///
    /// Absent and malformed timestamps never qualify.
    pub fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        matches!(self, Self::Valid(ts) if *ts > cutoff)
    }
}

/// Read-only view of a merge request: just what the roster needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestRef {
    /// Current state.
    pub state: MergeRequestState,

    /// Last update timestamp as sent by GitLab (ISO 8601).
    pub updated_at: String,

    /// Who opened the MR.
    pub author: Identity,

    /// Who the MR is assigned to, if anyone.
    pub assignee: Option<Identity>,
}

impl MergeRequestRef {
    /// Parse the last update timestamp.
    pub fn updated_at(&self) -> TimestampOutcome {
        TimestampOutcome::parse(&self.updated_at)
    }
}

impl From<GitLabMergeRequest> for MergeRequestRef {
    fn from(mr: GitLabMergeRequest) -> Self {
        Self {
            state: MergeRequestState::from(mr.state.as_str()),
            updated_at: mr.updated_at,
            author: mr.author.into(),
            assignee: mr.assignee.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_state_from_str() {
        assert_eq!(MergeRequestState::from("opened"), MergeRequestState::Opened);
        assert_eq!(MergeRequestState::from("MERGED"), MergeRequestState::Merged);
        assert_eq!(MergeRequestState::from("Closed"), MergeRequestState::Closed);
        assert_eq!(MergeRequestState::from("locked"), MergeRequestState::Locked);
        assert_eq!(MergeRequestState::from("reopened"), MergeRequestState::Unknown);
        assert_eq!(MergeRequestState::from(""), MergeRequestState::Unknown);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(MergeRequestState::Opened.to_string(), "opened");
        assert_eq!(MergeRequestState::Merged.to_string(), "merged");
        assert_eq!(MergeRequestState::Closed.to_string(), "closed");
        assert_eq!(MergeRequestState::Locked.to_string(), "locked");
    }

    #[test]
    fn test_timestamp_outcomes() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            TimestampOutcome::parse("2026-03-01T12:00:00Z"),
            TimestampOutcome::Valid(expected)
        );
        assert_eq!(
            TimestampOutcome::parse("2026-03-01T14:00:00.000+02:00"),
            TimestampOutcome::Valid(expected)
        );
        assert_eq!(TimestampOutcome::parse(""), TimestampOutcome::Absent);
        assert_eq!(
            TimestampOutcome::parse("yesterday"),
            TimestampOutcome::Malformed("yesterday".to_string())
        );
    }

    #[test]
    fn test_is_after_is_strict() {
        let cutoff = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(TimestampOutcome::parse("2026-03-01T12:00:01Z").is_after(cutoff));
        assert!(!TimestampOutcome::parse("2026-03-01T12:00:00Z").is_after(cutoff));
        assert!(!TimestampOutcome::parse("2026-02-28T12:00:00Z").is_after(cutoff));
        assert!(!TimestampOutcome::Absent.is_after(cutoff));
        assert!(!TimestampOutcome::parse("garbage").is_after(cutoff));
    }

    #[test]
    fn test_from_gitlab_merge_request() {
        let json = r#"{
            "id": 1001,
            "iid": 7,
            "title": "Add roster",
            "state": "merged",
            "web_url": "https://gitlab.com/g/p/-/merge_requests/7",
            "updated_at": "2026-03-01T12:00:00Z",
            "author": {"id": 1, "username": "alice", "name": "Alice", "avatar_url": null},
            "assignee": {"id": 3, "username": "carol", "name": "Carol", "avatar_url": "https://a/c.png"}
        }"#;
        let mr: GitLabMergeRequest = serde_json::from_str(json).unwrap();
        let mr = MergeRequestRef::from(mr);

        assert_eq!(mr.state, MergeRequestState::Merged);
        assert_eq!(mr.author.username, "alice");
        assert_eq!(mr.author.avatar_url, "");
        assert_eq!(mr.assignee.unwrap().avatar_url, "https://a/c.png");
    }
}
