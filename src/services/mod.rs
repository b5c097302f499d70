//! Business logic services.
//!
//! This module contains the GitLab client, the paginated crawls built on
//! top of it, the roster aggregation, and the HTTP API that exposes it.
//!
//! The aggregation only depends on the [`MergeRequestSource`] trait, so it
//! can be tested without a GitLab instance.

pub mod gitlab_client;
pub mod pagination;
pub mod roster;
pub mod roster_api;
pub mod roster_server;
pub mod source;

pub use gitlab_client::GitLabClient;
pub use roster::Roster;
pub use source::MergeRequestSource;
