//! starsync - Mirror GitHub stars into a Notion database.
//!
//! A sync run reads every repository the user has starred and every row of
//! a Notion database, creates rows for new stars and archives rows whose
//! repository is no longer starred. The engine only sees the traits in
//! [`source`], so the GitHub and Notion clients can be swapped for fakes.
//!
//! # Features
//!
//! - `github` - GitHub starred-repositories client
//! - `notion` - Notion database client
//! - `wechat` - WeChat Work notification sink
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starsync::github::GitHubClient;
//! use starsync::notion::NotionClient;
//! use starsync::sync::Syncer;
//! use tokio_util::sync::CancellationToken;
//!
//! let github = Arc::new(GitHubClient::new(github_token, transport.clone()));
//! let notion = Arc::new(NotionClient::new(notion_token, database_id, transport));
//!
//! let summary = Syncer::new(github, notion.clone(), notion)
//!     .sync_stars(&CancellationToken::new())
//!     .await?;
//! ```

pub mod collection;
pub mod http;
pub mod model;
pub mod notify;
pub mod source;
pub mod sync;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "notion")]
pub mod notion;

pub use collection::{RowCollection, StarredCollection};
pub use model::{DatabaseLayout, DatabaseRow, NewRow, StarredItem};
pub use notify::{NoOpNotifier, NotificationSink};
pub use source::{
    Cursor, DatabaseRowSource, DatabaseWriter, Page, SourceError, StarredItemSource,
};
pub use sync::{RunSummary, SyncError, SyncOptions, Syncer};
