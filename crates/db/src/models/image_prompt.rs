use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `image_prompts` table. A slide can own several prompt
/// variants, ordered by `variant_index`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImagePrompt {
    pub id: DbId,
    pub slide_id: DbId,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// `cheap` or `high`; a hint, not a binding model choice.
    pub model_hint: String,
    pub variant_index: i32,
    pub created_at: Timestamp,
}

/// DTO for creating one prompt variant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImagePrompt {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub model_hint: String,
    pub variant_index: i32,
}
