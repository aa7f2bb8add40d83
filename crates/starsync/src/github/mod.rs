//! GitHub API client for the authenticated user's starred repositories.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Response data structures
//! - [`client`] - The client and Link header pagination
//! - [`convert`] - Conversion to source records
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starsync::github::GitHubClient;
//! use starsync::http::reqwest_transport::{ReqwestTransport, DEFAULT_TIMEOUT};
//!
//! let transport = Arc::new(ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?);
//! let client = GitHubClient::new(&token, transport);
//! ```

mod client;
mod convert;
mod error;
mod types;

// Re-export error types
pub use error::GitHubError;

// Re-export API types
pub use types::{RepoResponse, StarredRepoResponse};

// Re-export client types and functions
pub use client::{DEFAULT_API_URL, GitHubClient, LinkPagination, parse_link_header};

// Re-export model conversion
pub use convert::to_raw_star;
