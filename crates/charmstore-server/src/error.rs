//! Router error taxonomy.

use charmstore_domain::DomainError;
use charmstore_storage::StorageError;
use thiserror::Error;

/// Errors produced while routing a request.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// The id does not resolve or no handler matches the path.
    #[error("{message}")]
    NotFound { message: String },

    /// A facet matched but holds no data for this particular id.
    #[error("metadata not found")]
    DataNotFound,

    /// An include or facet name has no registered handler.
    #[error("unrecognized metadata name {name:?}")]
    UnrecognizedMetadata { name: String },

    /// Malformed request input.
    #[error("{message}")]
    BadRequest { message: String },

    /// Malformed charm or bundle id.
    #[error(transparent)]
    InvalidId(#[from] DomainError),

    /// Backend storage failure.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Any other failure.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl RouterError {
    /// The plain "not found" error.
    pub fn not_found() -> Self {
        RouterError::NotFound {
            message: "not found".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RouterError::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RouterError::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::NotFound { .. })
    }
}

impl From<StorageError> for RouterError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EntityNotFound { id } => RouterError::NotFound {
                message: format!("no matching charm or bundle for {id:?}"),
            },
            other => RouterError::Storage {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;
