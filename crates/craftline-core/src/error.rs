//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A business record was not found.
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// The record type that was looked up.
        kind: &'static str,
        /// The identifier that was looked up.
        id: Uuid,
    },

    /// A natural-key uniqueness constraint was violated on insert.
    #[error("duplicate {kind} for {key_field} {key}")]
    DuplicateRecord {
        /// The record type that was inserted.
        kind: &'static str,
        /// The natural-key field that collided.
        key_field: &'static str,
        /// The colliding key value.
        key: Uuid,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
