use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quality_metrics` table. One-to-one with a slide,
/// recorded for the generation chosen as best.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QualityMetrics {
    pub id: DbId,
    pub slide_id: DbId,
    pub adherence: i16,
    pub legibility: i16,
    pub brand_consistency: i16,
    pub premium_look: i16,
    pub publish_readiness: i16,
    pub publish_ready: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting metrics, keyed by `slide_id`. Sub-scores are 0-5.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertQualityMetrics {
    pub adherence: i16,
    pub legibility: i16,
    pub brand_consistency: i16,
    pub premium_look: i16,
    pub publish_readiness: i16,
    pub publish_ready: bool,
}
