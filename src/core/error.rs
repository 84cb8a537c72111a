//! Typed error handling for the API
//!
//! Every failure a handler can produce is a variant of [`ApiError`], which
//! knows its HTTP status, its wire-level error kind, and how to render the
//! failure envelope:
//!
//! ```json
//! { "success": false, "error": "<ErrorKind>", "message": "<detail>" }
//! ```

use crate::query::plan::QueryError;
use crate::storage::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for the API
#[derive(Debug)]
pub enum ApiError {
    /// Query-parameter validation failures (page, per_page, filter values)
    Query(QueryError),

    /// Request-body validation failures, one message per broken rule
    Validation(Vec<String>),

    /// Malformed request (missing body, bad JSON)
    BadRequest(String),

    /// Entity lookup failed
    NotFound { entity: &'static str, id: Uuid },

    /// Route exists for no resource
    RouteNotFound,

    /// Uniqueness violation
    Conflict(String),

    /// Missing or unknown bearer token
    Unauthorized(String),

    /// Valid token but insufficient role
    Forbidden(String),

    /// Caller exceeded the configured request budget
    RateLimited,

    /// Storage collaborator unreachable
    StorageUnavailable(String),

    /// Unexpected internal failure
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Query(e) => write!(f, "{}", e),
            ApiError::Validation(messages) => write!(f, "{}", messages.join("; ")),
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::NotFound { entity, id } => {
                write!(f, "{} with id '{}' not found", entity, id)
            }
            ApiError::RouteNotFound => write!(f, "The requested resource was not found"),
            ApiError::Conflict(msg) => write!(f, "{}", msg),
            ApiError::Unauthorized(msg) => write!(f, "{}", msg),
            ApiError::Forbidden(msg) => write!(f, "{}", msg),
            ApiError::RateLimited => write!(f, "Rate limit exceeded, retry later"),
            ApiError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "An unexpected error occurred: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Failure envelope serialized to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(_) | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound { .. } | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the wire-level error kind for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Query(e) => e.error_code(),
            ApiError::Validation(_) => "Validation Error",
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound { .. } | ApiError::RouteNotFound => "Not Found",
            ApiError::Conflict(_) => "Conflict",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::RateLimited => "Too Many Requests",
            ApiError::StorageUnavailable(_) => "StorageUnavailable",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    /// Convert to the failure envelope
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Query(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => ApiError::StorageUnavailable(msg),
            StoreError::NotFound { entity, id } => ApiError::NotFound { entity, id },
        }
    }
}
