use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// HTTP mapping happens in the API crate; this type stays
/// transport-agnostic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested state transition is not allowed from the current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unclassified internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}
