//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One entry of `GET /user/starred` with the `star+json` media type.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredRepoResponse {
    /// When the authenticated user starred the repository.
    pub starred_at: DateTime<Utc>,
    pub repo: RepoResponse,
}

/// The subset of a repository object the sync reads.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Body of a GitHub error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starred_repo_response_deserializes() {
        let json = r#"{
            "starred_at": "2024-03-01T12:00:00Z",
            "repo": {
                "id": 1296269,
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "description": null,
                "html_url": "https://github.com/octocat/Hello-World",
                "language": "Rust",
                "stargazers_count": 80
            }
        }"#;

        let star: StarredRepoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(star.repo.id, 1296269);
        assert_eq!(star.repo.name, "Hello-World");
        assert!(star.repo.description.is_none());
        assert!(star.repo.topics.is_empty());
        assert_eq!(star.repo.language.as_deref(), Some("Rust"));
        assert_eq!(star.starred_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }
}
