//! API error type for alumni-map
//!
//! Every failure is returned as `{"detail": <message>, "code": <CODE>}`.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::ImportError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// JSON body missing, malformed, or lacking required fields
    #[error(transparent)]
    Json(#[from] JsonRejection),

    /// Request is not `multipart/form-data` or has no boundary
    #[error(transparent)]
    Multipart(#[from] MultipartRejection),

    /// Multipart stream broken or larger than the upload limit
    #[error(transparent)]
    Upload(#[from] MultipartError),

    /// alumni-common error
    #[error(transparent)]
    Common(#[from] alumni_common::Error),

    /// Import pipeline error
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        use alumni_common::Error as CommonError;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Json(rejection) => (rejection.status(), "INVALID_BODY"),
            ApiError::Multipart(rejection) => (rejection.status(), "INVALID_UPLOAD"),
            ApiError::Upload(err) => (err.status(), "INVALID_UPLOAD"),
            ApiError::Common(err) => match err {
                CommonError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                CommonError::InvalidInput(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            },
            ApiError::Import(err) => match err {
                ImportError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_URL"),
                ImportError::Fetch { .. } => (StatusCode::BAD_REQUEST, "SHEET_NOT_ACCESSIBLE"),
                ImportError::Schema { .. } => (StatusCode::BAD_REQUEST, "MISSING_COLUMNS"),
                ImportError::Format(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PARSE_ERROR"),
                ImportError::Transport(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
                ImportError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let detail = match &self {
            ApiError::Json(rejection) => rejection.body_text(),
            ApiError::Multipart(rejection) => rejection.body_text(),
            ApiError::Upload(err) => err.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code, detail = %detail, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), code, detail = %detail, "Request rejected");
        }

        (status, Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
