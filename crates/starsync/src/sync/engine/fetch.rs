use tokio_util::sync::CancellationToken;

use crate::collection::{RowCollection, StarredCollection};
use crate::model::{StarredItem, dedup_topics};
use crate::source::{
    Cursor, DatabaseRowSource, Page, RawStar, SourceError, StarredItemSource,
};

use super::super::errors::FetchError;
use super::super::progress::{ProgressCallback, SourceKind, SyncProgress, emit};
use super::super::types::ROWS_PAGE_SIZE;
use super::schema::PropertyMapping;

/// Ingest every starred repository, following the cursor until the source
/// reports no further pages.
pub(super) async fn fetch_starred(
    source: &dyn StarredItemSource,
    cancel: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> Result<StarredCollection, FetchError> {
    let mut collection = StarredCollection::new();
    let mut cursor = Cursor::Initial;
    let mut page_num = 0u32;

    emit(
        on_progress,
        SyncProgress::Fetching {
            source: SourceKind::Starred,
        },
    );

    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let page = source.list_page(&cursor).await?;
        page_num += 1;

        let next = next_cursor(&page, SourceKind::Starred)?;
        let count = page.items.len();
        collection.extend(page.items.into_iter().map(normalize_star));

        tracing::debug!(page = page_num, count, total = collection.len(), "Fetched starred page");
        emit(
            on_progress,
            SyncProgress::FetchedPage {
                source: SourceKind::Starred,
                page: page_num,
                count,
                total_so_far: collection.len(),
            },
        );

        match next {
            Some(next) => cursor = next,
            None => break,
        }
    }

    emit(
        on_progress,
        SyncProgress::FetchComplete {
            source: SourceKind::Starred,
            total: collection.len(),
        },
    );

    Ok(collection)
}

/// Ingest every row of the database, decoding each through `mapping`.
///
/// A row that fails to decode aborts ingestion.
pub(super) async fn fetch_rows(
    source: &dyn DatabaseRowSource,
    mapping: &PropertyMapping,
    cancel: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> Result<RowCollection, FetchError> {
    let mut collection = RowCollection::new();
    let mut cursor = Cursor::Initial;
    let mut page_num = 0u32;

    emit(
        on_progress,
        SyncProgress::Fetching {
            source: SourceKind::Rows,
        },
    );

    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let page = source.query_page(&cursor, ROWS_PAGE_SIZE).await?;
        page_num += 1;

        let next = next_cursor(&page, SourceKind::Rows)?;
        let count = page.items.len();
        for raw in &page.items {
            collection.add(mapping.decode_row(raw)?);
        }

        tracing::debug!(page = page_num, count, total = collection.len(), "Fetched row page");
        emit(
            on_progress,
            SyncProgress::FetchedPage {
                source: SourceKind::Rows,
                page: page_num,
                count,
                total_so_far: collection.len(),
            },
        );

        match next {
            Some(next) => cursor = next,
            None => break,
        }
    }

    emit(
        on_progress,
        SyncProgress::FetchComplete {
            source: SourceKind::Rows,
            total: collection.len(),
        },
    );

    Ok(collection)
}

/// Cursor for the page after `page`, or `None` when it was the last one.
fn next_cursor<T>(page: &Page<T>, source: SourceKind) -> Result<Option<Cursor>, SourceError> {
    if !page.has_more {
        return Ok(None);
    }

    match &page.next_cursor {
        Some(token) => Ok(Some(Cursor::Token(token.clone()))),
        None => Err(SourceError::internal(format!(
            "{source} source reported more pages without a cursor"
        ))),
    }
}

/// Convert an upstream record into a [`StarredItem`].
fn normalize_star(raw: RawStar) -> StarredItem {
    StarredItem {
        source_id: raw.id,
        name: raw.name,
        description: raw.description.unwrap_or_default(),
        url: raw.html_url,
        topics: dedup_topics(raw.topics),
        language: raw.language.unwrap_or_default(),
        starred_at: raw.starred_at,
    }
}
