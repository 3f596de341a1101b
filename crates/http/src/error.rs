//! Error handling for the Folio HTTP layer

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Standard error payload for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Vec<serde_json::Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Envelope wrapping [`ErrorBody`] under an `error` key
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("conflict: {message}")]
    Conflict {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            code: "conflict".to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Status code this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON whose fields have the wrong shape
            JsonRejection::JsonDataError(err) => AppError::validation(
                vec![json!({ "field": "body", "error": err.body_text() })],
                "request body failed validation",
            ),
            other => AppError::bad_request(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let now = OffsetDateTime::now_utc();
        // RFC 3339 only fails for years outside 0..=9999
        let timestamp = now.format(&Rfc3339).unwrap_or_else(|_| now.to_string());
        let status = self.status();

        let (error_code, message, details) = match self {
            AppError::Validation {
                details,
                code,
                message,
            }
            | AppError::Conflict {
                details,
                code,
                message,
            } => (code, message, details),
            AppError::NotFound { message, code } | AppError::BadRequest { message, code } => {
                (code, message, Vec::new())
            }
            AppError::Internal(e) => (
                "internal_error".to_string(),
                format!("{:#}", e),
                Vec::new(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                error = %message,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        // Internal details stay in the log for release builds
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: error_code,
                message,
                details,
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        (status, Json(body)).into_response()
    }
}
