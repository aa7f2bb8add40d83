//! Notion API client for the target database.
//!
//! # Module Structure
//!
//! - [`client`] - The database-bound client
//! - [`properties`] - Request bodies for page writes
//! - [`rate_limit`] - Request pacing
//! - [`types`] - Response data structures
//! - [`error`] - Error types and `SourceError` mapping

mod client;
mod error;
mod properties;
mod rate_limit;
mod types;

pub use client::NotionClient;
pub use error::NotionError;
pub use properties::{create_page_body, page_properties};
pub use rate_limit::{ApiRateLimiter, NOTION_DEFAULT_RPS};
pub use types::{DEFAULT_API_URL, NOTION_VERSION};
