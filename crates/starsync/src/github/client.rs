//! GitHub API client for listing the authenticated user's stars.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use super::convert::to_raw_star;
use super::error::{GitHubError, is_rate_limited};
use super::types::{ErrorResponse, StarredRepoResponse};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::source::{self, Cursor, Page, RawStar, StarredItemSource};
use crate::sync::STARRED_PAGE_SIZE;

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type that adds `starred_at` to each starred entry.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
}

impl LinkPagination {
    /// Returns the total number of pages if known.
    pub fn total_pages(&self) -> Option<u32> {
        self.last_page
    }
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/user/starred?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            match rel_type {
                "last" => info.last_page = Some(page_num),
                "next" => info.next_page = Some(page_num),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Client for the starred-repositories endpoint.
///
/// No proactive pacing: a full sync needs one request per hundred stars.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token: token.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Override the API root (GitHub Enterprise or tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn starred_url(&self, page: u32) -> String {
        format!(
            "{}/user/starred?per_page={}&page={}",
            self.base_url, STARRED_PAGE_SIZE, page
        )
    }

    /// Fetch one page of starred repositories.
    pub async fn list_starred_page(
        &self,
        page: u32,
    ) -> Result<(Vec<StarredRepoResponse>, LinkPagination), GitHubError> {
        let request = HttpRequest::new(HttpMethod::Get, self.starred_url(page))
            .header("Accept", STAR_MEDIA_TYPE)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", "2022-11-28");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Self::status_error(&response));
        }

        let pagination = response
            .header("link")
            .map(parse_link_header)
            .unwrap_or_default();
        let stars: Vec<StarredRepoResponse> = response.json()?;

        tracing::debug!(
            page,
            count = stars.len(),
            next_page = ?pagination.next_page,
            last_page = ?pagination.total_pages(),
            "Fetched starred repositories"
        );

        Ok((stars, pagination))
    }

    fn status_error(response: &HttpResponse) -> GitHubError {
        let remaining = response
            .header("x-ratelimit-remaining")
            .and_then(|v| v.parse::<u64>().ok());

        if is_rate_limited(response.status, remaining) {
            let reset_at = response
                .header("x-ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
                .unwrap_or_else(Utc::now);
            return GitHubError::RateLimited { reset_at };
        }

        match response.status {
            401 | 403 => GitHubError::AuthRequired,
            status => GitHubError::Api {
                status,
                message: response
                    .json::<ErrorResponse>()
                    .map(|body| body.message)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned()),
            },
        }
    }
}

#[async_trait]
impl StarredItemSource for GitHubClient {
    async fn list_page(&self, cursor: &Cursor) -> source::Result<Page<RawStar>> {
        let page = match cursor.token() {
            None => 1,
            Some(token) => token
                .parse::<u32>()
                .map_err(|_| GitHubError::InvalidCursor(token.to_string()))?,
        };

        let (stars, pagination) = self.list_starred_page(page).await?;
        let items = stars.into_iter().map(to_raw_star).collect();

        Ok(match pagination.next_page {
            Some(next) => Page::with_next(items, next.to_string()),
            None => Page::last(items),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::http::MockTransport;
    use crate::source::SourceError;

    use super::*;

    fn starred_json(id: i64, name: &str) -> serde_json::Value {
        json!({
            "starred_at": "2024-01-02T03:04:05Z",
            "repo": {
                "id": id,
                "name": name,
                "description": format!("{name} description"),
                "html_url": format!("https://github.com/octocat/{name}"),
                "topics": ["rust"],
                "language": "Rust"
            }
        })
    }

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new("ghp_test", Arc::new(transport.clone()))
    }

    #[test]
    fn test_parse_link_header_full() {
        let header = r#"<https://api.github.com/user/starred?per_page=100&page=2>; rel="next", <https://api.github.com/user/starred?per_page=100&page=3>; rel="last""#;

        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.last_page, Some(3));
        assert_eq!(info.total_pages(), Some(3));
    }

    #[test]
    fn test_parse_link_header_only_prev_and_first() {
        let header = r#"<https://api.github.com/user/starred?per_page=100&page=1>; rel="prev", <https://api.github.com/user/starred?per_page=100&page=1>; rel="first""#;

        let info = parse_link_header(header);
        assert_eq!(info, LinkPagination::default());
    }

    #[test]
    fn test_parse_link_header_empty() {
        assert_eq!(parse_link_header(""), LinkPagination::default());
    }

    #[test]
    fn test_extract_page_from_url() {
        assert_eq!(
            extract_page_from_url("https://api.github.com/user/starred?per_page=100&page=3"),
            Some(3)
        );
        assert_eq!(
            extract_page_from_url("https://api.github.com/user/starred?per_page=100"),
            None
        );
        assert_eq!(extract_page_from_url("not a url"), None);
    }

    #[tokio::test]
    async fn test_list_page_follows_link_header() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            "https://api.github.com/user/starred?per_page=100&page=1",
            HttpResponse {
                status: 200,
                headers: vec![(
                    "Link".to_string(),
                    r#"<https://api.github.com/user/starred?per_page=100&page=2>; rel="next""#
                        .to_string(),
                )],
                body: json!([starred_json(1, "a"), starred_json(2, "b")])
                    .to_string()
                    .into_bytes(),
            },
        );
        transport.push_json(
            HttpMethod::Get,
            "https://api.github.com/user/starred?per_page=100&page=2",
            200,
            json!([starred_json(3, "c")]),
        );

        let client = client(&transport);
        let first = client.list_page(&Cursor::Initial).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let second = client
            .list_page(&Cursor::Token("2".to_string()))
            .await
            .unwrap();
        assert_eq!(second.items[0].name, "c");
        assert!(!second.has_more);

        let requests = transport.requests();
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "accept"),
            Some(STAR_MEDIA_TYPE)
        );
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "authorization"),
            Some("Bearer ghp_test")
        );
    }

    #[tokio::test]
    async fn test_list_page_unauthorized() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            "https://api.github.com/user/starred?per_page=100&page=1",
            401,
            json!({ "message": "Bad credentials" }),
        );

        let err = client(&transport)
            .list_page(&Cursor::Initial)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::AuthRequired));
    }

    #[tokio::test]
    async fn test_list_page_rate_limited() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            "https://api.github.com/user/starred?per_page=100&page=1",
            HttpResponse {
                status: 403,
                headers: vec![
                    ("x-ratelimit-remaining".to_string(), "0".to_string()),
                    ("x-ratelimit-reset".to_string(), "1700000000".to_string()),
                ],
                body: br#"{"message":"API rate limit exceeded"}"#.to_vec(),
            },
        );

        let err = client(&transport)
            .list_page(&Cursor::Initial)
            .await
            .unwrap_err();
        match err {
            SourceError::RateLimited { reset_at } => assert_eq!(reset_at.timestamp(), 1700000000),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_page_server_error_carries_message() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            "https://api.github.com/user/starred?per_page=100&page=1",
            502,
            json!({ "message": "Server Error" }),
        );

        let err = client(&transport)
            .list_page(&Cursor::Initial)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Server Error"));
    }

    #[tokio::test]
    async fn test_list_page_rejects_non_numeric_cursor() {
        let transport = MockTransport::new();

        let err = client(&transport)
            .list_page(&Cursor::Token("abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Internal { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_with_base_url() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Get,
            "https://ghe.example.com/api/v3/user/starred?per_page=100&page=1",
            200,
            json!([]),
        );

        let page = client(&transport)
            .with_base_url("https://ghe.example.com/api/v3/")
            .list_page(&Cursor::Initial)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }
}
