//! In-memory sources and writer used by the engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::model::NewRow;
use crate::source::{
    Cursor, DatabaseRowSource, DatabaseSchema, DatabaseWriter, Page, PropertyType, PropertyValue,
    RawRow, RawStar, Result, RichText, SourceError, StarredItemSource,
};

pub(crate) fn raw_star(id: i64, name: &str) -> RawStar {
    RawStar {
        id,
        name: name.to_string(),
        description: Some(format!("{name} description")),
        html_url: format!("https://github.com/octocat/{name}"),
        topics: vec!["rust".to_string()],
        language: Some("Rust".to_string()),
        starred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub(crate) fn raw_row(row_id: &str, title: &str, source_id: i64) -> RawRow {
    let properties = HashMap::from([
        (
            "Name".to_string(),
            PropertyValue::Title {
                title: vec![RichText {
                    plain_text: title.to_string(),
                }],
            },
        ),
        (
            "Repository ID".to_string(),
            PropertyValue::Number {
                number: Some(source_id as f64),
            },
        ),
    ]);

    RawRow {
        id: row_id.to_string(),
        properties,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn page_index(cursor: &Cursor) -> usize {
    cursor
        .token()
        .map(|t| t.parse().expect("fake cursors are page indexes"))
        .unwrap_or(0)
}

/// Starred source serving a fixed list of pages.
///
/// Cursor tokens are page indexes.
#[derive(Clone, Default)]
pub(crate) struct FakeStars {
    pages: Arc<Vec<Page<RawStar>>>,
    failures: Arc<Mutex<HashMap<usize, SourceError>>>,
    cursors: Arc<Mutex<Vec<Cursor>>>,
}

impl FakeStars {
    pub(crate) fn with_pages(pages: Vec<Vec<RawStar>>) -> Self {
        let last = pages.len().saturating_sub(1);
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, items)| {
                if i == last {
                    Page::last(items)
                } else {
                    Page::with_next(items, (i + 1).to_string())
                }
            })
            .collect();
        Self::from_raw_pages(pages)
    }

    pub(crate) fn from_raw_pages(pages: Vec<Page<RawStar>>) -> Self {
        Self {
            pages: Arc::new(pages),
            ..Self::default()
        }
    }

    /// Make the request for page `index` fail once.
    pub(crate) fn fail_page(&self, index: usize, err: SourceError) {
        lock(&self.failures).insert(index, err);
    }

    pub(crate) fn cursors(&self) -> Vec<Cursor> {
        lock(&self.cursors).clone()
    }
}

#[async_trait]
impl StarredItemSource for FakeStars {
    async fn list_page(&self, cursor: &Cursor) -> Result<Page<RawStar>> {
        lock(&self.cursors).push(cursor.clone());

        let index = page_index(cursor);
        if let Some(err) = lock(&self.failures).remove(&index) {
            return Err(err);
        }

        Ok(self
            .pages
            .get(index)
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new())))
    }
}

#[derive(Default)]
struct DatabaseState {
    schema: DatabaseSchema,
    schema_error: Option<SourceError>,
    rows: Vec<RawRow>,
    page_sizes: Vec<usize>,
    created: Vec<NewRow>,
    archived: Vec<String>,
    create_failures: HashMap<String, String>,
    archive_failures: HashMap<String, String>,
    create_panics: HashSet<String>,
    archive_panics: HashSet<String>,
    next_id: usize,
    in_flight: usize,
    max_in_flight: usize,
}

/// A live in-memory database.
///
/// Created rows become visible to later queries and archived rows
/// disappear from them, so a second sync sees the first one's writes.
#[derive(Clone)]
pub(crate) struct FakeDatabase {
    state: Arc<Mutex<DatabaseState>>,
}

impl FakeDatabase {
    pub(crate) fn new() -> Self {
        let schema = [
            ("Name", PropertyType::Title),
            ("Repository ID", PropertyType::Number),
            ("Description", PropertyType::RichText),
            ("URL", PropertyType::Url),
            ("Topics", PropertyType::MultiSelect),
            ("Language", PropertyType::Select),
            ("Starred At", PropertyType::Date),
        ]
        .into_iter()
        .collect();

        Self {
            state: Arc::new(Mutex::new(DatabaseState {
                schema,
                ..DatabaseState::default()
            })),
        }
    }

    pub(crate) fn schema(&self) -> DatabaseSchema {
        lock(&self.state).schema.clone()
    }

    pub(crate) fn set_schema(&self, schema: DatabaseSchema) {
        lock(&self.state).schema = schema;
    }

    pub(crate) fn fail_schema(&self, err: SourceError) {
        lock(&self.state).schema_error = Some(err);
    }

    pub(crate) fn set_rows(&self, rows: Vec<RawRow>) {
        lock(&self.state).rows = rows;
    }

    pub(crate) fn fail_create(&self, title: &str, message: &str) {
        lock(&self.state)
            .create_failures
            .insert(title.to_string(), message.to_string());
    }

    pub(crate) fn fail_archive(&self, row_id: &str, message: &str) {
        lock(&self.state)
            .archive_failures
            .insert(row_id.to_string(), message.to_string());
    }

    pub(crate) fn panic_on_create(&self, title: &str) {
        lock(&self.state).create_panics.insert(title.to_string());
    }

    pub(crate) fn panic_on_archive(&self, row_id: &str) {
        lock(&self.state).archive_panics.insert(row_id.to_string());
    }

    pub(crate) fn created(&self) -> Vec<NewRow> {
        lock(&self.state).created.clone()
    }

    pub(crate) fn archived(&self) -> Vec<String> {
        lock(&self.state).archived.clone()
    }

    pub(crate) fn query_page_sizes(&self) -> Vec<usize> {
        lock(&self.state).page_sizes.clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        lock(&self.state).max_in_flight
    }

    fn enter(&self) {
        let mut state = lock(&self.state);
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
    }

    fn leave(&self) {
        lock(&self.state).in_flight -= 1;
    }
}

#[async_trait]
impl DatabaseRowSource for FakeDatabase {
    async fn get_schema(&self) -> Result<DatabaseSchema> {
        let mut state = lock(&self.state);
        match state.schema_error.take() {
            Some(err) => Err(err),
            None => Ok(state.schema.clone()),
        }
    }

    async fn query_page(&self, cursor: &Cursor, page_size: usize) -> Result<Page<RawRow>> {
        let mut state = lock(&self.state);
        state.page_sizes.push(page_size);

        let start = page_index(cursor);
        let end = (start + page_size).min(state.rows.len());
        let items = state.rows.get(start..end).unwrap_or_default().to_vec();

        if end < state.rows.len() {
            Ok(Page::with_next(items, end.to_string()))
        } else {
            Ok(Page::last(items))
        }
    }
}

#[async_trait]
impl DatabaseWriter for FakeDatabase {
    async fn create_row(&self, row: &NewRow) -> Result<String> {
        if lock(&self.state).create_panics.contains(&row.title) {
            panic!("create_row panicked for {}", row.title);
        }
        self.enter();
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.leave();

        let mut state = lock(&self.state);
        if let Some(message) = state.create_failures.get(&row.title) {
            return Err(SourceError::api(message.clone()));
        }

        state.next_id += 1;
        let row_id = format!("created-{}", state.next_id);
        state.created.push(row.clone());
        let raw = raw_row(&row_id, &row.title, row.source_id);
        state.rows.push(raw);
        Ok(row_id)
    }

    async fn archive_row(&self, row_id: &str) -> Result<()> {
        if lock(&self.state).archive_panics.contains(row_id) {
            panic!("archive_row panicked for {row_id}");
        }
        self.enter();
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.leave();

        let mut state = lock(&self.state);
        if let Some(message) = state.archive_failures.get(row_id) {
            return Err(SourceError::api(message.clone()));
        }

        state.archived.push(row_id.to_string());
        state.rows.retain(|row| row.id != row_id);
        Ok(())
    }
}
