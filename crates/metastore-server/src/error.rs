use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use metastore_codec::CodecError;
use metastore_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Client-visible failure of a request, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::CONFLICT
        };
        Self::new(status, err.to_string())
    }
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        let status = match err {
            CodecError::Format { .. } | CodecError::UnknownFormat(_) => StatusCode::BAD_REQUEST,
            CodecError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use metastore_codec::Format;

    #[test]
    fn store_errors_map_to_statuses() {
        let missing = ApiError::from(StoreError::IdentifierNotFound { id: "Foo".into() });
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let dup = ApiError::from(StoreError::KeyExists {
            id: "Foo".into(),
            key: "Bar".into(),
        });
        assert_eq!(dup.status, StatusCode::CONFLICT);
        assert!(dup.message.contains("Bar"));
    }

    #[test]
    fn codec_errors_map_to_statuses() {
        let bad = ApiError::from(CodecError::Format {
            format: Format::Json,
            reason: "eof".into(),
        });
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let unknown = ApiError::from(CodecError::UnknownFormat("xml".into()));
        assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_carries_status() {
        let resp = ApiError::new(StatusCode::BAD_REQUEST, "nope").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
