//! Run-scoped entities for both sides of the sync.

use chrono::{DateTime, Utc};

/// A repository the user has starred upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarredItem {
    /// Stable upstream identifier.
    pub source_id: i64,
    /// Repository name.
    pub name: String,
    /// Repository description (empty when upstream has none).
    pub description: String,
    /// Browser URL of the repository.
    pub url: String,
    /// Repository topics, in upstream order without duplicates.
    pub topics: Vec<String>,
    /// Primary language (empty when upstream has none).
    pub language: String,
    /// When the user starred the repository.
    pub starred_at: DateTime<Utc>,
}

impl StarredItem {
    /// Name used for this item in logs and reports.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

/// A row of the external database that mirrors one starred item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRow {
    /// Opaque handle of the row in the external database.
    pub row_id: String,
    /// Title of the row.
    pub title: String,
    /// Foreign key back to [`StarredItem::source_id`].
    pub source_id: i64,
}

impl DatabaseRow {
    /// Name used for this row in logs and reports.
    pub fn display_name(&self) -> &str {
        &self.title
    }
}

/// Property names used in the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLayout {
    /// Title property holding the repository name.
    pub title: String,
    /// Number property holding the upstream repository ID.
    pub source_id: String,
    pub description: String,
    pub url: String,
    pub topics: String,
    pub language: String,
    pub starred_at: String,
}

impl Default for DatabaseLayout {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            source_id: "Repository ID".to_string(),
            description: "Description".to_string(),
            url: "URL".to_string(),
            topics: "Topics".to_string(),
            language: "Language".to_string(),
            starred_at: "Starred At".to_string(),
        }
    }
}

/// Fields written when a row is created for a starred item.
///
/// The row carries the property names it was validated against, so a
/// writer never needs its own copy of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRow {
    pub layout: DatabaseLayout,
    pub title: String,
    pub source_id: i64,
    pub description: Option<String>,
    pub url: Option<String>,
    pub topics: Option<Vec<String>>,
    pub language: Option<String>,
    pub starred_at: Option<DateTime<Utc>>,
}

impl NewRow {
    /// A row carrying only the two required fields.
    pub fn required(title: impl Into<String>, source_id: i64) -> Self {
        Self {
            layout: DatabaseLayout::default(),
            title: title.into(),
            source_id,
            description: None,
            url: None,
            topics: None,
            language: None,
            starred_at: None,
        }
    }
}

/// Remove repeated topics while keeping the first occurrence of each.
pub(crate) fn dedup_topics(topics: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(topics.len());
    topics
        .into_iter()
        .filter(|topic| seen.insert(topic.clone()))
        .collect()
}
