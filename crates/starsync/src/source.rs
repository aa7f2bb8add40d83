//! Abstract interfaces to the external systems the sync engine talks to.
//!
//! The engine only sees these traits. Concrete clients (GitHub, Notion)
//! live in their own modules and implement them.
//!
//! # Example
//!
//! ```ignore
//! use starsync::source::{Cursor, StarredItemSource};
//!
//! async fn first_page<S: StarredItemSource>(source: &S) -> starsync::source::Result<usize> {
//!     let page = source.list_page(&Cursor::Initial).await?;
//!     Ok(page.items.len())
//! }
//! ```

mod errors;
mod types;

pub use errors::{Result, SourceError, short_error_message};
pub use types::{
    Cursor, DatabaseRowSource, DatabaseSchema, DatabaseWriter, DateValue, Page, PropertyType,
    PropertyValue, RawRow, RawStar, RichText, SelectOption, StarredItemSource,
};
