//! Notion API data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::source::{DatabaseSchema, PropertyType, RawRow};

/// API version sent in the `Notion-Version` header.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default Notion API root.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// Response of `GET /databases/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseResponse {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
}

impl DatabaseResponse {
    pub fn schema(&self) -> DatabaseSchema {
        self.properties
            .iter()
            .map(|(name, prop)| (name.clone(), prop.kind.clone()))
            .collect()
    }
}

/// A property declaration in a database schema.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

/// Body of `POST /databases/{id}/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// Response of `POST /databases/{id}/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<RawRow>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Response of page create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub id: String,
}

/// Body of a Notion error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use crate::source::PropertyValue;

    use super::*;

    #[test]
    fn test_database_response_schema() {
        let json = r#"{
            "object": "database",
            "id": "db-1",
            "properties": {
                "Name": { "id": "title", "type": "title", "title": {} },
                "Repository ID": { "id": "a1", "type": "number", "number": { "format": "number" } },
                "Status": { "id": "b2", "type": "status", "status": {} }
            }
        }"#;

        let db: DatabaseResponse = serde_json::from_str(json).unwrap();
        let schema = db.schema();

        assert_eq!(schema.property("Name"), Some(&PropertyType::Title));
        assert_eq!(schema.property("Repository ID"), Some(&PropertyType::Number));
        assert_eq!(
            schema.property("Status"),
            Some(&PropertyType::Other("status".to_string()))
        );
    }

    #[test]
    fn test_query_request_omits_missing_cursor() {
        let first = QueryRequest {
            page_size: 50,
            start_cursor: None,
        };
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::json!({ "page_size": 50 })
        );

        let next = QueryRequest {
            page_size: 50,
            start_cursor: Some("cur-2"),
        };
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            serde_json::json!({ "page_size": 50, "start_cursor": "cur-2" })
        );
    }

    #[test]
    fn test_query_response_decodes_typed_properties() {
        let json = r#"{
            "object": "list",
            "results": [{
                "object": "page",
                "id": "page-1",
                "properties": {
                    "Name": { "id": "title", "type": "title", "title": [{ "type": "text", "plain_text": "ripgrep" }] },
                    "Repository ID": { "id": "a1", "type": "number", "number": 42 },
                    "Stars": { "id": "c3", "type": "rollup", "rollup": {} }
                }
            }],
            "has_more": true,
            "next_cursor": "cur-2"
        }"#;

        let resp: QueryResponse = serde_json::from_str(json).unwrap();
        assert!(resp.has_more);
        assert_eq!(resp.next_cursor.as_deref(), Some("cur-2"));

        let row = &resp.results[0];
        assert_eq!(row.id, "page-1");
        assert_eq!(
            row.properties.get("Repository ID"),
            Some(&PropertyValue::Number { number: Some(42.0) })
        );
        assert_eq!(row.properties.get("Stars"), Some(&PropertyValue::Other));
    }
}
