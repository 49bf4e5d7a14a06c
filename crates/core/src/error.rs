use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// An upstream reference whose trailing segment is not a positive integer.
    #[error("Malformed resource reference: {0:?}")]
    MalformedReference(String),

    /// An upstream record field with an unexpected shape.
    #[error("Malformed {field} value: {value:?}")]
    MalformedRecord { field: &'static str, value: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
