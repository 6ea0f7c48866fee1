//! Error types for HTTP handlers and their response mapping.

use axum::{
    extract::multipart::MultipartError,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::catalog::store::CatalogError;
use crate::http::range::MalformedRange;

/// Failures while streaming a media file.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("file not found")]
    NotFound,
    #[error(transparent)]
    MalformedRange(#[from] MalformedRange),
    #[error("range not satisfiable for {file_size} byte file")]
    RangeNotSatisfiable { file_size: u64 },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StreamError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StreamError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StreamError::NotFound => StatusCode::NOT_FOUND,
            StreamError::MalformedRange(_) => StatusCode::BAD_REQUEST,
            StreamError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            StreamError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            StreamError::NotFound => {
                (status, Json(json!({ "error": "File not found" }))).into_response()
            }
            StreamError::MalformedRange(e) => {
                tracing::debug!("{}", e);
                (status, Json(json!({ "error": "Malformed Range header" }))).into_response()
            }
            // Plain text, not the JSON envelope the other paths use.
            StreamError::RangeNotSatisfiable { file_size } => (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{}", file_size))],
                "Requested range not satisfiable",
            )
                .into_response(),
            StreamError::Io { .. } => {
                tracing::error!("{}", self);
                (status, Json(json!({ "error": "Error reading file" }))).into_response()
            }
        }
    }
}

/// Failures in the catalog JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(&'static str),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("invalid form data: {0}")]
    Multipart(#[from] MultipartError),
    #[error("failed to store poster {path}: {source}")]
    Poster {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn poster(path: &std::path::Path, source: std::io::Error) -> Self {
        ApiError::Poster {
            path: path.display().to_string(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::Catalog(_) | ApiError::Poster { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Catalog request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
