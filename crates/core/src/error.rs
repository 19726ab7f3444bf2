use serde_json::json;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The operation is blocked by related data or by the command itself
    /// (e.g. an ontology still used by a project, a command that refuses undo).
    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Structured values attached to the error envelope sent to clients.
    pub fn values(&self) -> serde_json::Value {
        match self {
            Self::NotFound { entity, id } => json!({ "entity": entity, "id": id }),
            _ => json!({}),
        }
    }
}
