//! Repository for the `quality_metrics` table.

use carousel_core::types::DbId;
use sqlx::PgPool;

use crate::models::quality_metrics::{QualityMetrics, UpsertQualityMetrics};

const COLUMNS: &str = "id, slide_id, adherence, legibility, brand_consistency, premium_look, \
    publish_readiness, publish_ready, created_at, updated_at";

pub struct QualityMetricsRepo;

impl QualityMetricsRepo {
    /// Upsert metrics keyed by `slide_id`, recorded for the winning
    /// generation only.
    pub async fn upsert(
        pool: &PgPool,
        slide_id: DbId,
        input: &UpsertQualityMetrics,
    ) -> Result<QualityMetrics, sqlx::Error> {
        let query = format!(
            "INSERT INTO quality_metrics
                (slide_id, adherence, legibility, brand_consistency, premium_look,
                 publish_readiness, publish_ready)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (slide_id) DO UPDATE SET
                adherence = EXCLUDED.adherence,
                legibility = EXCLUDED.legibility,
                brand_consistency = EXCLUDED.brand_consistency,
                premium_look = EXCLUDED.premium_look,
                publish_readiness = EXCLUDED.publish_readiness,
                publish_ready = EXCLUDED.publish_ready,
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QualityMetrics>(&query)
            .bind(slide_id)
            .bind(input.adherence)
            .bind(input.legibility)
            .bind(input.brand_consistency)
            .bind(input.premium_look)
            .bind(input.publish_readiness)
            .bind(input.publish_ready)
            .fetch_one(pool)
            .await
    }

    /// Find the metrics row for a slide, if ranking has run.
    pub async fn find_by_slide(
        pool: &PgPool,
        slide_id: DbId,
    ) -> Result<Option<QualityMetrics>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quality_metrics WHERE slide_id = $1");
        sqlx::query_as::<_, QualityMetrics>(&query)
            .bind(slide_id)
            .fetch_optional(pool)
            .await
    }
}
