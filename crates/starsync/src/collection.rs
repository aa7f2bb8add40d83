//! Ordered, lookup-indexed collections for both sides of the sync.
//!
//! Both collections keep an append-ordered `Vec` for iteration plus a
//! `HashMap` index keyed by source ID, so membership tests are O(1) and
//! iteration follows arrival order.

use std::collections::HashMap;

use crate::model::{DatabaseRow, StarredItem};

/// Starred items keyed by source ID.
#[derive(Debug, Clone, Default)]
pub struct StarredCollection {
    index: HashMap<i64, usize>,
    items: Vec<StarredItem>,
}

impl StarredCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, overwriting any item with the same source ID in place.
    pub fn add(&mut self, item: StarredItem) {
        match self.index.get(&item.source_id) {
            Some(&position) => self.items[position] = item,
            None => {
                self.index.insert(item.source_id, self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn contains(&self, source_id: i64) -> bool {
        self.index.contains_key(&source_id)
    }

    pub fn get(&self, source_id: i64) -> Option<&StarredItem> {
        self.index.get(&source_id).map(|&position| &self.items[position])
    }

    /// Items in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, StarredItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<StarredItem> for StarredCollection {
    fn extend<T: IntoIterator<Item = StarredItem>>(&mut self, iter: T) {
        for item in iter {
            self.add(item);
        }
    }
}

impl FromIterator<StarredItem> for StarredCollection {
    fn from_iter<T: IntoIterator<Item = StarredItem>>(iter: T) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<'a> IntoIterator for &'a StarredCollection {
    type Item = &'a StarredItem;
    type IntoIter = std::slice::Iter<'a, StarredItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Database rows with a source-ID membership index.
///
/// Rows are keyed by their row ID. Several rows may point at the same
/// source ID (a manually duplicated page, for instance); all of them are
/// kept and the membership index records the first one seen.
#[derive(Debug, Clone, Default)]
pub struct RowCollection {
    by_source_id: HashMap<i64, String>,
    by_row_id: HashMap<String, usize>,
    rows: Vec<DatabaseRow>,
}

impl RowCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, overwriting any row with the same row ID in place.
    pub fn add(&mut self, row: DatabaseRow) {
        self.by_source_id
            .entry(row.source_id)
            .or_insert_with(|| row.row_id.clone());

        match self.by_row_id.get(&row.row_id) {
            Some(&position) => self.rows[position] = row,
            None => {
                self.by_row_id.insert(row.row_id.clone(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    pub fn contains_source_id(&self, source_id: i64) -> bool {
        self.by_source_id.contains_key(&source_id)
    }

    /// Row ID of the first row seen for `source_id`.
    pub fn row_id_for(&self, source_id: i64) -> Option<&str> {
        self.by_source_id.get(&source_id).map(String::as_str)
    }

    /// Rows in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, DatabaseRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Extend<DatabaseRow> for RowCollection {
    fn extend<T: IntoIterator<Item = DatabaseRow>>(&mut self, iter: T) {
        for row in iter {
            self.add(row);
        }
    }
}

impl FromIterator<DatabaseRow> for RowCollection {
    fn from_iter<T: IntoIterator<Item = DatabaseRow>>(iter: T) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<'a> IntoIterator for &'a RowCollection {
    type Item = &'a DatabaseRow;
    type IntoIter = std::slice::Iter<'a, DatabaseRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::model::{DatabaseRow, StarredItem};

    pub(crate) fn star(source_id: i64, name: &str) -> StarredItem {
        StarredItem {
            source_id,
            name: name.to_string(),
            description: format!("{name} description"),
            url: format!("https://github.com/octocat/{name}"),
            topics: vec!["rust".to_string()],
            language: "Rust".to_string(),
            starred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub(crate) fn row(row_id: &str, source_id: i64) -> DatabaseRow {
        DatabaseRow {
            row_id: row_id.to_string(),
            title: format!("title-{row_id}"),
            source_id,
        }
    }
}
