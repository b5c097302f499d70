//! Data models for the roster service.
//!
//! These models are the entities the core reads from GitLab and hands back
//! to the HTTP layer. Nothing here is persisted.

pub mod identity;
pub mod merge_request;
pub mod project;

// Re-exports for convenient access
pub use identity::Identity;
pub use merge_request::{MergeRequestRef, MergeRequestState, TimestampOutcome};
pub use project::Project;
