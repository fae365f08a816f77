use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::brand::Brand;
use crate::models::post::Post;

/// A row from the `slides` table. `slide_index` is 0-based and position
/// significant: index 0 is always the cover.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slide {
    pub id: DbId,
    pub post_id: DbId,
    pub slide_index: i32,
    pub slide_text: String,
    pub layout_preset: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Slide {
    /// Whether this slide is the carousel cover.
    pub fn is_cover(&self) -> bool {
        self.slide_index == 0
    }
}

/// DTO for creating a slide.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlide {
    pub post_id: DbId,
    pub slide_index: i32,
    pub slide_text: String,
    pub layout_preset: Option<String>,
}

/// The slide -> post -> project -> brand chain, resolved in one lookup.
/// Every pipeline stage needs brand context for the slide it operates on.
#[derive(Debug, Clone)]
pub struct SlideChain {
    pub slide: Slide,
    pub post: Post,
    pub brand: Brand,
}
