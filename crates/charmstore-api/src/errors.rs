//! Error envelope for HTTP responses.
//!
//! Every failure is returned as a JSON object:
//!
//! ```json
//! {"Message": "no matching charm or bundle for \"cs:wordpress\"", "Code": "not found"}
//! ```
//!
//! The HTTP status is derived from `Code`. An empty code marks an
//! uncategorized internal error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use charmstore_domain::DomainError;
use charmstore_server::RouterError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error codes carried in the `Code` field.
///
/// | Code | Status |
/// |------|--------|
/// | [`NOT_FOUND`] | 404 |
/// | [`METADATA_NOT_FOUND`] | 404 |
/// | [`BAD_REQUEST`] | 400 |
/// | [`METHOD_NOT_ALLOWED`] | 405 |
/// | [`INTERNAL_ERROR`] | 500 |
pub mod error_codes {
    /// The id does not resolve or no handler matches the path.
    pub const NOT_FOUND: &str = "not found";
    /// The facet has no data for this id.
    pub const METADATA_NOT_FOUND: &str = "metadata not found";
    /// Malformed id, unknown facet name, or missing parameters.
    pub const BAD_REQUEST: &str = "bad request";
    /// The path exists but not for this method.
    pub const METHOD_NOT_ALLOWED: &str = "method not allowed";
    /// Uncategorized internal error.
    pub const INTERNAL_ERROR: &str = "";
}

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Code", default)]
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::NOT_FOUND, message)
    }

    /// Creates a metadata not found error (404).
    pub fn metadata_not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::METADATA_NOT_FOUND, message)
    }

    /// Creates a bad request error (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(error_codes::BAD_REQUEST, message)
    }

    /// Creates a method not allowed error (405).
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(error_codes::METHOD_NOT_ALLOWED, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// HTTP status for this error's code.
    pub fn status(&self) -> StatusCode {
        use error_codes::*;

        match self.code.as_str() {
            NOT_FOUND | METADATA_NOT_FOUND => StatusCode::NOT_FOUND,
            BAD_REQUEST => StatusCode::BAD_REQUEST,
            METHOD_NOT_ALLOWED => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        match &err {
            RouterError::NotFound { message } => ApiError::not_found(message.clone()),
            RouterError::DataNotFound => ApiError::metadata_not_found(err.to_string()),
            RouterError::UnrecognizedMetadata { .. }
            | RouterError::BadRequest { .. }
            | RouterError::InvalidId(_) => ApiError::bad_request(err.to_string()),
            RouterError::Storage { .. } | RouterError::Internal { .. } => {
                error!(error = %err, "request failed");
                ApiError::internal_error(err.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        RouterError::from(err).into()
    }
}
