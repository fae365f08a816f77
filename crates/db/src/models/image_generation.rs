use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `image_generations` table: one candidate image produced
/// for a slide. At most one generation per slide has `is_selected = true`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageGeneration {
    pub id: DbId,
    pub slide_id: DbId,
    pub prompt_id: Option<DbId>,
    pub model_used: String,
    pub image_url: String,
    pub thumb_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub seed: Option<i64>,
    /// 0-100, assigned by the ranking engine.
    pub ranking_score: Option<i32>,
    pub ranking_reason: Option<String>,
    pub is_selected: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a freshly generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImageGeneration {
    pub slide_id: DbId,
    pub prompt_id: Option<DbId>,
    pub model_used: String,
    pub image_url: String,
    pub thumb_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub seed: Option<i64>,
}

/// Per-candidate update written by the ranking engine.
#[derive(Debug, Clone)]
pub struct RankingUpdate {
    pub generation_id: DbId,
    pub ranking_score: i32,
    pub ranking_reason: Option<String>,
    pub is_selected: bool,
}
