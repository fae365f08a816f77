use carousel_core::brief::BriefFields;
use carousel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `visual_briefs` table. One-to-one with a slide; upserts
/// by `slide_id` overwrite the prior brief.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisualBrief {
    pub id: DbId,
    pub slide_id: DbId,
    pub theme: Option<String>,
    pub key_message: Option<String>,
    pub emotion: Option<String>,
    pub visual_metaphor: Option<String>,
    pub style: Option<String>,
    pub palette: Json<Vec<String>>,
    pub negative_elements: Option<String>,
    pub text_on_image: bool,
    pub text_limit_words: i32,
    pub composition_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a brief, keyed by `slide_id`.
#[derive(Debug, Clone)]
pub struct UpsertVisualBrief {
    pub slide_id: DbId,
    pub fields: BriefFields,
}
