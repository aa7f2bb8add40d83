//! Notion API client for database reads and page writes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::NotionError;
use super::properties::{archive_page_body, create_page_body};
use super::rate_limit::ApiRateLimiter;
use super::types::{
    DEFAULT_API_URL, DatabaseResponse, NOTION_VERSION, PageResponse, QueryRequest, QueryResponse,
};
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::model::NewRow;
use crate::source::{
    self, Cursor, DatabaseRowSource, DatabaseSchema, DatabaseWriter, Page, RawRow,
};

/// Client bound to a single Notion database.
///
/// Every request waits on a shared [`ApiRateLimiter`], so clones and
/// concurrent tasks stay within one integration's budget.
#[derive(Clone)]
pub struct NotionClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
    database_id: String,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl NotionClient {
    pub fn new(
        token: impl Into<String>,
        database_id: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            token: token.into(),
            database_id: database_id.into(),
            base_url: DEFAULT_API_URL.to_string(),
            rate_limiter: ApiRateLimiter::default(),
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: ApiRateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Override the API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, NotionError> {
        self.rate_limiter.wait().await;

        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let err = NotionError::from_response(&response);
            tracing::debug!(method = method.as_str(), url = %url, error = %err, "Notion request failed");
            return Err(err);
        }

        Ok(response.json()?)
    }

    /// Fetch the database object.
    pub async fn get_database(&self) -> Result<DatabaseResponse, NotionError> {
        let path = format!("/databases/{}", self.database_id);
        self.execute(self.request(HttpMethod::Get, &path)).await
    }

    /// Query one page of database rows.
    pub async fn query_database(
        &self,
        start_cursor: Option<&str>,
        page_size: usize,
    ) -> Result<QueryResponse, NotionError> {
        let path = format!("/databases/{}/query", self.database_id);
        let body = serde_json::to_value(QueryRequest {
            page_size,
            start_cursor,
        })?;
        self.execute(self.request(HttpMethod::Post, &path).json(&body))
            .await
    }

    /// Create a page in the database and return its ID.
    pub async fn create_page(&self, row: &NewRow) -> Result<String, NotionError> {
        let body = create_page_body(&self.database_id, row);
        let page: PageResponse = self
            .execute(self.request(HttpMethod::Post, "/pages").json(&body))
            .await?;
        Ok(page.id)
    }

    /// Archive a page.
    pub async fn archive_page(&self, page_id: &str) -> Result<(), NotionError> {
        let path = format!("/pages/{page_id}");
        let _: PageResponse = self
            .execute(
                self.request(HttpMethod::Patch, &path)
                    .json(&archive_page_body()),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseRowSource for NotionClient {
    async fn get_schema(&self) -> source::Result<DatabaseSchema> {
        let database = self.get_database().await?;
        Ok(database.schema())
    }

    async fn query_page(&self, cursor: &Cursor, page_size: usize) -> source::Result<Page<RawRow>> {
        let response = self.query_database(cursor.token(), page_size).await?;

        Ok(Page {
            items: response.results,
            next_cursor: response.next_cursor,
            has_more: response.has_more,
        })
    }
}

#[async_trait]
impl DatabaseWriter for NotionClient {
    async fn create_row(&self, row: &NewRow) -> source::Result<String> {
        Ok(self.create_page(row).await?)
    }

    async fn archive_row(&self, row_id: &str) -> source::Result<()> {
        Ok(self.archive_page(row_id).await?)
    }
}
