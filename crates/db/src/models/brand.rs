//! Brand identity models.

use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `brands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub name: String,
    /// Ordered color tokens, e.g. `["#111111", "#fafafa"]`.
    pub palette: Json<Vec<String>>,
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub visual_tone: Option<String>,
    pub do_rules: Option<String>,
    pub dont_rules: Option<String>,
    /// Machine-derived style guide; may go stale (tracked by the dirty
    /// fields below, never recomputed automatically).
    pub style_guide: Option<serde_json::Value>,
    pub template_sets_dirty: bool,
    pub template_sets_dirty_count: i32,
    pub template_sets_updated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a brand.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub palette: Vec<String>,
    pub heading_font: Option<String>,
    pub body_font: Option<String>,
    pub visual_tone: Option<String>,
    pub do_rules: Option<String>,
    pub dont_rules: Option<String>,
}

/// A row from the `brand_examples` table (reference posts the style
/// analysis derives the guide from).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrandExample {
    pub id: DbId,
    pub brand_id: DbId,
    pub image_url: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}
