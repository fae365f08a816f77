//! Repository for the `image_prompts` table.

use carousel_core::types::DbId;
use sqlx::PgPool;

use crate::models::image_prompt::{CreateImagePrompt, ImagePrompt};

const COLUMNS: &str =
    "id, slide_id, prompt, negative_prompt, model_hint, variant_index, created_at";

pub struct ImagePromptRepo;

impl ImagePromptRepo {
    /// Replace a slide's prompt variants: delete the old set, insert the new
    /// one. The prompt builder always produces a full replacement set.
    pub async fn replace_for_slide(
        pool: &PgPool,
        slide_id: DbId,
        inputs: &[CreateImagePrompt],
    ) -> Result<Vec<ImagePrompt>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM image_prompts WHERE slide_id = $1")
            .bind(slide_id)
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(inputs.len());
        let query = format!(
            "INSERT INTO image_prompts (slide_id, prompt, negative_prompt, model_hint, variant_index)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        for input in inputs {
            let row = sqlx::query_as::<_, ImagePrompt>(&query)
                .bind(slide_id)
                .bind(&input.prompt)
                .bind(&input.negative_prompt)
                .bind(&input.model_hint)
                .bind(input.variant_index)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// List a slide's prompts ordered by `variant_index`.
    pub async fn list_by_slide(
        pool: &PgPool,
        slide_id: DbId,
    ) -> Result<Vec<ImagePrompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM image_prompts WHERE slide_id = $1 ORDER BY variant_index ASC"
        );
        sqlx::query_as::<_, ImagePrompt>(&query)
            .bind(slide_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single prompt by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ImagePrompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM image_prompts WHERE id = $1");
        sqlx::query_as::<_, ImagePrompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
