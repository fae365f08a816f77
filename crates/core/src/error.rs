use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("AI gateway error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("No parseable JSON object in model response: {0}")]
    Extraction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
