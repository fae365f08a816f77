use carousel_core::types::DbId;
use carousel_gateway::GatewayError;
use carousel_storage::StorageError;

/// Errors surfaced by pipeline stages.
///
/// Per-variation failures inside the generation loop are logged and skipped,
/// not raised; everything here is fatal for the enclosing stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The AI gateway answered with a non-2xx status (or the request failed).
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// An upstream 429 surfaced to the caller. Only style analysis raises
    /// this; the variation loop absorbs rate limits by skipping.
    #[error("Rate limited by AI gateway: {0}")]
    RateLimited(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The model reply contained no parseable JSON object.
    #[error("No parseable JSON object in {stage} response")]
    Extraction { stage: &'static str },

    #[error("Internal error: {0}")]
    Internal(String),
}
