//! JSON bodies for Notion page writes.

use serde_json::{Map, Value, json};

use crate::model::NewRow;

fn text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

/// Build the property map for a new page.
///
/// Property names come from the row's layout. Optional fields are present
/// only when the row carries them.
pub fn page_properties(row: &NewRow) -> Map<String, Value> {
    let layout = &row.layout;
    let mut props = Map::new();

    props.insert(layout.title.clone(), json!({ "title": text(&row.title) }));
    props.insert(layout.source_id.clone(), json!({ "number": row.source_id }));

    if let Some(description) = &row.description {
        props.insert(
            layout.description.clone(),
            json!({ "rich_text": text(description) }),
        );
    }
    if let Some(url) = &row.url {
        props.insert(layout.url.clone(), json!({ "url": url }));
    }
    if let Some(topics) = &row.topics {
        let options: Vec<Value> = topics.iter().map(|t| json!({ "name": t })).collect();
        props.insert(layout.topics.clone(), json!({ "multi_select": options }));
    }
    if let Some(language) = &row.language {
        props.insert(
            layout.language.clone(),
            json!({ "select": { "name": language } }),
        );
    }
    if let Some(starred_at) = &row.starred_at {
        props.insert(
            layout.starred_at.clone(),
            json!({ "date": { "start": starred_at.to_rfc3339() } }),
        );
    }

    props
}

/// Body of `POST /pages` for a row in `database_id`.
pub fn create_page_body(database_id: &str, row: &NewRow) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": page_properties(row),
    })
}

/// Body of `PATCH /pages/{id}` that archives the page.
pub fn archive_page_body() -> Value {
    json!({ "archived": true })
}
