//! Domain error types for identifier parsing.

use thiserror::Error;

/// Errors produced while parsing charm and bundle identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The id carries a schema other than `cs:`.
    #[error("charm or bundle URL has invalid schema: {id:?}")]
    InvalidSchema { id: String },

    /// The id has no name element.
    #[error("charm or bundle URL has empty name: {id:?}")]
    EmptyName { id: String },

    /// The name element does not follow the charm name grammar.
    #[error("charm or bundle URL has invalid name: {id:?}")]
    InvalidName { id: String },

    /// The owner element does not follow the user name grammar.
    #[error("charm or bundle URL has invalid user name: {id:?}")]
    InvalidUser { id: String },

    /// The series element is not a valid series token.
    #[error("charm or bundle URL has invalid series: {id:?}")]
    InvalidSeries { id: String },

    /// The revision does not fit in a revision number.
    #[error("charm or bundle URL has invalid revision: {id:?}")]
    InvalidRevision { id: String },

    /// The id has more path elements than owner, series and name.
    #[error("charm or bundle URL has invalid form: {id:?}")]
    InvalidForm { id: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
