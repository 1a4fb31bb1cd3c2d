use crate::types::DbId;

/// Domain errors raised when placing or validating orders.
///
/// Inside the tick these only surface as per-item failures. A queue row
/// naming an unknown unit kind fails with `Validation` and is rolled back
/// on its own.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
