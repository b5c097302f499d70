//! Command-line and environment configuration.
//!
//! Every flag can also come from the environment so the service runs
//! unchanged in a container.

use crate::error::AppError;
use crate::services::gitlab_client::GitLabClientConfig;
use clap::Parser;

/// Roster - who is actively working on a GitLab project
///
/// Serves `GET /projects` and `GET /roster/{project_id}` backed by live
/// GitLab API calls.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// GitLab personal or application access token
    #[arg(long, env = "GITLAB_ACCESS_TOKEN", hide_env_values = true)]
    pub gitlab_access_token: String,

    /// GitLab instance URL (with or without the trailing /api/v4)
    #[arg(long, default_value = "https://gitlab.com", env = "GITLAB_API_URL")]
    pub gitlab_api_url: String,

    /// Listening port
    #[arg(long, default_value_t = 8080, env = "ROSTER_PORT")]
    pub port: u16,

    /// Timeout for each GitLab request, in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub timeout_secs: u64,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.gitlab_access_token.trim().is_empty() {
            return Err(AppError::invalid_input_field(
                "access token must not be empty",
                "gitlab_access_token",
            ));
        }

        if !self.gitlab_api_url.starts_with("http://") && !self.gitlab_api_url.starts_with("https://")
        {
            return Err(AppError::invalid_input_field(
                format!("{} is not an http(s) URL", self.gitlab_api_url),
                "gitlab_api_url",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::invalid_input_field(
                "timeout must be at least one second",
                "timeout_secs",
            ));
        }

        Ok(())
    }

    /// Instance root URL; the client appends `/api/v4` itself.
    pub fn base_url(&self) -> String {
        let url = self.gitlab_api_url.trim().trim_end_matches('/');
        url.strip_suffix("/api/v4").unwrap_or(url).to_string()
    }

    /// GitLab client settings derived from the flags.
    pub fn client_config(&self) -> GitLabClientConfig {
        GitLabClientConfig {
            base_url: self.base_url(),
            token: self.gitlab_access_token.trim().to_string(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
