//! # Posts API Errors
//!
//! Typed request-level failures. Handlers return these as values and the
//! `IntoResponse` impl below is the single place they become responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type for post operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Body sent when an error carries no client-facing message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Posts API errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No post with the given id. The id is kept in its rendered form so
    /// unparseable route ids can be reported as `NaN`.
    #[error("Post with id {0} not found")]
    PostNotFound(String),

    /// Payload failed schema validation
    #[error("{}", .0.join(", "))]
    PostNotValid(Vec<String>),

    /// Body could not be decoded at all
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// A path parameter could not be decoded
    #[error("Malformed request path: {0}")]
    MalformedPath(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(id: impl ToString) -> Self {
        ApiError::PostNotFound(id.to_string())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PostNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PostNotValid(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) | ApiError::MalformedPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text sent back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Attached to error responses so the request logging layer can report
/// the failure alongside the request path.
#[derive(Debug, Clone)]
pub struct ErrorReport(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let report = ErrorReport(self.to_string());
        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response();
        response.extensions_mut().insert(report);
        response
    }
}
