//! Database schema validation and typed row decoding.
//!
//! The engine reads exactly two properties from each row: the title and the
//! numeric source ID. Both must exist with the right type before any row is
//! queried. Descriptive properties are optional and only written when the
//! database declares them with the expected type.

use thiserror::Error;

use crate::model::{DatabaseRow, NewRow, StarredItem};
pub use crate::model::DatabaseLayout;
use crate::source::{DatabaseSchema, PropertyType, PropertyValue, RawRow};

/// Notion's limit on the length of a single rich text fragment.
const MAX_RICH_TEXT_CHARS: usize = 2000;

impl DatabaseLayout {
    /// Properties that must exist, with their required types.
    pub fn required_properties(&self) -> [(&str, PropertyType); 2] {
        [
            (self.title.as_str(), PropertyType::Title),
            (self.source_id.as_str(), PropertyType::Number),
        ]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("notion database is missing required property {property}")]
    MissingProperty { property: String },

    #[error("notion database property {property} is of type {found}, but should be {expected}")]
    WrongType {
        property: String,
        expected: PropertyType,
        found: PropertyType,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("row {row_id}: property {field} should be {expected}, found {found}")]
    FieldShape {
        row_id: String,
        field: String,
        expected: PropertyType,
        found: String,
    },

    #[error("row {row_id}: property {field} has no value")]
    MissingValue { row_id: String, field: String },
}

/// Which properties a validated database can receive on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    layout: DatabaseLayout,
    description: bool,
    url: bool,
    topics: bool,
    language: bool,
    starred_at: bool,
    unwritable: Vec<String>,
}

impl PropertyMapping {
    /// Optional properties the database does not declare with the expected
    /// type. Their values are dropped from every created row.
    pub fn unwritable(&self) -> &[String] {
        &self.unwritable
    }

    /// Map a starred item onto the row fields this database accepts.
    pub fn new_row(&self, item: &StarredItem) -> NewRow {
        NewRow {
            layout: self.layout.clone(),
            title: item.name.clone(),
            source_id: item.source_id,
            description: self
                .description
                .then(|| truncate_chars(&item.description, MAX_RICH_TEXT_CHARS)),
            url: (self.url && !item.url.is_empty()).then(|| item.url.clone()),
            topics: self.topics.then(|| item.topics.clone()),
            language: (self.language && !item.language.is_empty()).then(|| item.language.clone()),
            starred_at: self.starred_at.then_some(item.starred_at),
        }
    }

    /// Decode a raw row into a [`DatabaseRow`].
    pub fn decode_row(&self, raw: &RawRow) -> Result<DatabaseRow, DecodeError> {
        let title = match property(raw, &self.layout.title, PropertyType::Title)? {
            PropertyValue::Title { title } => title.iter().map(|t| t.plain_text.as_str()).collect(),
            other => return Err(shape_error(raw, &self.layout.title, PropertyType::Title, other)),
        };

        let source_id = match property(raw, &self.layout.source_id, PropertyType::Number)? {
            PropertyValue::Number { number: Some(n) } => {
                float_to_id(*n).ok_or_else(|| DecodeError::FieldShape {
                    row_id: raw.id.clone(),
                    field: self.layout.source_id.clone(),
                    expected: PropertyType::Number,
                    found: format!("non-integer number {n}"),
                })?
            }
            PropertyValue::Number { number: None } => {
                return Err(DecodeError::MissingValue {
                    row_id: raw.id.clone(),
                    field: self.layout.source_id.clone(),
                });
            }
            other => {
                return Err(shape_error(
                    raw,
                    &self.layout.source_id,
                    PropertyType::Number,
                    other,
                ));
            }
        };

        Ok(DatabaseRow {
            row_id: raw.id.clone(),
            title,
            source_id,
        })
    }
}

/// Check that the schema has every property the engine reads.
///
/// Returns the mapping of optional properties the database can receive.
pub fn validate_schema(
    schema: &DatabaseSchema,
    layout: &DatabaseLayout,
) -> Result<PropertyMapping, SchemaError> {
    for (name, expected) in layout.required_properties() {
        let Some(found) = schema.property(name) else {
            return Err(SchemaError::MissingProperty {
                property: name.to_string(),
            });
        };

        if *found != expected {
            return Err(SchemaError::WrongType {
                property: name.to_string(),
                expected,
                found: found.clone(),
            });
        }
    }

    let mut unwritable = Vec::new();
    let mut has = |name: &str, expected: PropertyType| {
        let declared = schema.property(name) == Some(&expected);
        if !declared {
            tracing::debug!(property = name, expected = %expected, "Optional property not writable");
            unwritable.push(name.to_string());
        }
        declared
    };

    let description = has(&layout.description, PropertyType::RichText);
    let url = has(&layout.url, PropertyType::Url);
    let topics = has(&layout.topics, PropertyType::MultiSelect);
    let language = has(&layout.language, PropertyType::Select);
    let starred_at = has(&layout.starred_at, PropertyType::Date);

    Ok(PropertyMapping {
        layout: layout.clone(),
        description,
        url,
        topics,
        language,
        starred_at,
        unwritable,
    })
}

fn property<'a>(
    raw: &'a RawRow,
    field: &str,
    expected: PropertyType,
) -> Result<&'a PropertyValue, DecodeError> {
    raw.properties
        .get(field)
        .ok_or_else(|| DecodeError::FieldShape {
            row_id: raw.id.clone(),
            field: field.to_string(),
            expected,
            found: "nothing".to_string(),
        })
}

fn shape_error(
    raw: &RawRow,
    field: &str,
    expected: PropertyType,
    found: &PropertyValue,
) -> DecodeError {
    DecodeError::FieldShape {
        row_id: raw.id.clone(),
        field: field.to_string(),
        expected,
        found: found.property_type().to_string(),
    }
}

fn float_to_id(n: f64) -> Option<i64> {
    // 2^53: beyond this f64 can't represent every integer exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (n.fract() == 0.0 && n.abs() <= MAX_EXACT).then_some(n as i64)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
