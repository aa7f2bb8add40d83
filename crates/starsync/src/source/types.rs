use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::NewRow;

use super::errors::Result;

/// Pagination position for a paginated upstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// No page has been requested yet.
    #[default]
    Initial,
    /// Opaque continuation token handed back by the upstream.
    Token(String),
}

impl Cursor {
    /// The continuation token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Initial => None,
            Self::Token(token) => Some(token),
        }
    }
}

/// One page of upstream results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Token for the next page (if the upstream provided one).
    pub next_cursor: Option<String>,
    /// Whether the upstream reports more pages after this one.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            has_more: false,
        }
    }

    /// A page followed by the page at `next_cursor`.
    pub fn with_next(items: Vec<T>, next_cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(next_cursor.into()),
            has_more: true,
        }
    }
}

/// A starred repository as returned by the upstream, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStar {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub topics: Vec<String>,
    pub language: Option<String>,
    pub starred_at: DateTime<Utc>,
}

/// A database row as returned by a query, with its typed property map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A fragment of rich text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// A select option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// A date (or date range) value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

/// A typed property value on a database row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Number { number: Option<f64> },
    Url { url: Option<String> },
    Select { select: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Date { date: Option<DateValue> },
    Checkbox { checkbox: bool },
    #[serde(other)]
    Other,
}

impl PropertyValue {
    /// The property type this value belongs to.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Title { .. } => PropertyType::Title,
            Self::RichText { .. } => PropertyType::RichText,
            Self::Number { .. } => PropertyType::Number,
            Self::Url { .. } => PropertyType::Url,
            Self::Select { .. } => PropertyType::Select,
            Self::MultiSelect { .. } => PropertyType::MultiSelect,
            Self::Date { .. } => PropertyType::Date,
            Self::Checkbox { .. } => PropertyType::Checkbox,
            Self::Other => PropertyType::Other("unsupported".to_string()),
        }
    }
}

/// The declared type of a database property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum PropertyType {
    Title,
    RichText,
    Number,
    Url,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Other(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Url => "url",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for PropertyType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "number" => Self::Number,
            "url" => Self::Url,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            "date" => Self::Date,
            "checkbox" => Self::Checkbox,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to field type mapping of a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    pub properties: HashMap<String, PropertyType>,
}

impl DatabaseSchema {
    pub fn property(&self, name: &str) -> Option<&PropertyType> {
        self.properties.get(name)
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyType)> for DatabaseSchema {
    fn from_iter<T: IntoIterator<Item = (K, PropertyType)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Source of the user's starred repositories.
///
/// Implementors return one page per call; the sync engine drives the
/// cursor until the source reports no further pages.
#[async_trait]
pub trait StarredItemSource: Send + Sync {
    /// Fetch the page of starred repositories at `cursor`.
    async fn list_page(&self, cursor: &Cursor) -> Result<Page<RawStar>>;
}

/// Read access to the target database.
#[async_trait]
pub trait DatabaseRowSource: Send + Sync {
    /// Fetch the declared property types of the database.
    async fn get_schema(&self) -> Result<DatabaseSchema>;

    /// Fetch up to `page_size` rows starting at `cursor`.
    async fn query_page(&self, cursor: &Cursor, page_size: usize) -> Result<Page<RawRow>>;
}

/// Write access to the target database.
#[async_trait]
pub trait DatabaseWriter: Send + Sync {
    /// Create a row and return its row ID.
    async fn create_row(&self, row: &NewRow) -> Result<String>;

    /// Archive (soft-delete) a row. Rows are never hard-deleted.
    async fn archive_row(&self, row_id: &str) -> Result<()>;
}
