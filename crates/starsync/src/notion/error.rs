//! Notion API error types.

use thiserror::Error;

use crate::http::{HttpError, HttpResponse};
use crate::source::SourceError;

use super::types::ErrorResponse;

/// Errors that can occur when interacting with the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("invalid Notion response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NotionError {
    /// Build an error from a non-2xx response.
    ///
    /// Notion answers with `{"object": "error", "code", "message"}`. A body
    /// that doesn't match keeps the raw text as the message.
    pub fn from_response(response: &HttpResponse) -> Self {
        match response.json::<ErrorResponse>() {
            Ok(body) => Self::Api {
                status: response.status,
                code: body.code,
                message: body.message,
            },
            Err(_) => Self::Api {
                status: response.status,
                code: format!("http_{}", response.status),
                message: String::from_utf8_lossy(&response.body).into_owned(),
            },
        }
    }
}

impl From<NotionError> for SourceError {
    fn from(err: NotionError) -> Self {
        match err {
            NotionError::Http(e) => SourceError::from(e),
            NotionError::Api { status: 401, .. } => SourceError::AuthRequired,
            NotionError::Api {
                status: 404,
                message,
                ..
            } => SourceError::not_found(message),
            NotionError::Api { .. } => SourceError::api(err.to_string()),
            NotionError::Decode(e) => SourceError::decode(e.to_string()),
        }
    }
}
