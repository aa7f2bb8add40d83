//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::http::HttpError;
use crate::source::SourceError;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Authentication required")]
    AuthRequired,

    #[error("invalid GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid page cursor: {0}")]
    InvalidCursor(String),
}

impl From<GitHubError> for SourceError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => SourceError::from(e),
            GitHubError::Api { .. } => SourceError::api(err.to_string()),
            GitHubError::RateLimited { reset_at } => SourceError::RateLimited { reset_at },
            GitHubError::AuthRequired => SourceError::AuthRequired,
            GitHubError::Decode(e) => SourceError::decode(e.to_string()),
            GitHubError::InvalidCursor(_) => SourceError::internal(err.to_string()),
        }
    }
}

/// Check if a status code and rate limit headers indicate rate limiting.
///
/// GitHub answers an exhausted primary limit with 403 (or 429) and
/// `x-ratelimit-remaining: 0`.
pub fn is_rate_limited(status: u16, remaining: Option<u64>) -> bool {
    (status == 403 || status == 429) && remaining == Some(0)
}
