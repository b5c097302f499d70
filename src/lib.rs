//! GitLab Roster - who is actively working on a GitLab project.
//!
//! Crawls a project's merge requests (open, plus merged/closed since a
//! recency cutoff), extracts authors and optionally assignees, and returns
//! them deduplicated by username. Exposed over a small read-only HTTP API.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
