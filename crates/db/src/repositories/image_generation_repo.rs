//! Repository for the `image_generations` table.
//!
//! Selection invariant: at most one row per slide has `is_selected = true`.
//! The write methods involved in enforcing it (`deselect_all`,
//! `select_winner`, `apply_ranking`) accept any `PgExecutor` so the ranking
//! engine can run the whole deselect-then-select sequence in one transaction.

use carousel_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::image_generation::{CreateImageGeneration, ImageGeneration, RankingUpdate};

const COLUMNS: &str = "id, slide_id, prompt_id, model_used, image_url, thumb_url, width, \
    height, seed, ranking_score, ranking_reason, is_selected, created_at, updated_at";

pub struct ImageGenerationRepo;

impl ImageGenerationRepo {
    /// Record a freshly generated candidate (`is_selected = false`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateImageGeneration,
    ) -> Result<ImageGeneration, sqlx::Error> {
        let query = format!(
            "INSERT INTO image_generations
                (slide_id, prompt_id, model_used, image_url, thumb_url, width, height, seed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageGeneration>(&query)
            .bind(input.slide_id)
            .bind(input.prompt_id)
            .bind(&input.model_used)
            .bind(&input.image_url)
            .bind(&input.thumb_url)
            .bind(input.width)
            .bind(input.height)
            .bind(input.seed)
            .fetch_one(pool)
            .await
    }

    /// List a slide's most recent candidates, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        slide_id: DbId,
        limit: i64,
    ) -> Result<Vec<ImageGeneration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM image_generations
             WHERE slide_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ImageGeneration>(&query)
            .bind(slide_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find a generation by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ImageGeneration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM image_generations WHERE id = $1");
        sqlx::query_as::<_, ImageGeneration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The slide's currently selected generation, if any.
    pub async fn find_selected(
        pool: &PgPool,
        slide_id: DbId,
    ) -> Result<Option<ImageGeneration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM image_generations
             WHERE slide_id = $1 AND is_selected = TRUE"
        );
        sqlx::query_as::<_, ImageGeneration>(&query)
            .bind(slide_id)
            .fetch_optional(pool)
            .await
    }

    /// Count selected rows for a slide (invariant checks in tests).
    pub async fn count_selected(pool: &PgPool, slide_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM image_generations WHERE slide_id = $1 AND is_selected = TRUE",
        )
        .bind(slide_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Clear the selection flag on every generation for a slide.
    pub async fn deselect_all<'e, E>(executor: E, slide_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE image_generations
             SET is_selected = FALSE, updated_at = now()
             WHERE slide_id = $1 AND is_selected = TRUE",
        )
        .bind(slide_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark one generation as selected, compare-and-set style: the update
    /// only applies if the generation belongs to the slide. Returns whether
    /// a row was updated.
    pub async fn select_winner<'e, E>(
        executor: E,
        slide_id: DbId,
        generation_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE image_generations
             SET is_selected = TRUE, updated_at = now()
             WHERE id = $1 AND slide_id = $2",
        )
        .bind(generation_id)
        .bind(slide_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write one candidate's ranking score, reason, and selection flag.
    pub async fn apply_ranking<'e, E>(
        executor: E,
        slide_id: DbId,
        update: &RankingUpdate,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "UPDATE image_generations
             SET ranking_score = $3, ranking_reason = $4, is_selected = $5, updated_at = now()
             WHERE id = $1 AND slide_id = $2",
        )
        .bind(update.generation_id)
        .bind(slide_id)
        .bind(update.ranking_score)
        .bind(&update.ranking_reason)
        .bind(update.is_selected)
        .execute(executor)
        .await?;
        Ok(())
    }
}
