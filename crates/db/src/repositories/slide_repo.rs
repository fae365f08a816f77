//! Repository for the `slides` table.

use carousel_core::types::DbId;
use sqlx::PgPool;

use crate::models::slide::{CreateSlide, Slide, SlideChain};
use crate::repositories::{BrandRepo, PostRepo, ProjectRepo};

const COLUMNS: &str =
    "id, post_id, slide_index, slide_text, layout_preset, image_url, created_at, updated_at";

pub struct SlideRepo;

impl SlideRepo {
    /// Insert a new slide, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSlide) -> Result<Slide, sqlx::Error> {
        let query = format!(
            "INSERT INTO slides (post_id, slide_index, slide_text, layout_preset)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slide>(&query)
            .bind(input.post_id)
            .bind(input.slide_index)
            .bind(&input.slide_text)
            .bind(&input.layout_preset)
            .fetch_one(pool)
            .await
    }

    /// Find a slide by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slides WHERE id = $1");
        sqlx::query_as::<_, Slide>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a post's slides in carousel order.
    pub async fn list_by_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Slide>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slides WHERE post_id = $1 ORDER BY slide_index ASC"
        );
        sqlx::query_as::<_, Slide>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Update a slide's canonical image URL.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE slides SET image_url = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(image_url)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Resolve the slide -> post -> project -> brand chain.
    ///
    /// Returns `None` if any link is missing; every pipeline stage treats
    /// that as a not-found failure for the slide.
    pub async fn find_chain(pool: &PgPool, slide_id: DbId) -> Result<Option<SlideChain>, sqlx::Error> {
        let Some(slide) = Self::find_by_id(pool, slide_id).await? else {
            return Ok(None);
        };
        let Some(post) = PostRepo::find_by_id(pool, slide.post_id).await? else {
            return Ok(None);
        };
        let Some(project) = ProjectRepo::find_by_id(pool, post.project_id).await? else {
            return Ok(None);
        };
        let Some(brand) = BrandRepo::find_by_id(pool, project.brand_id).await? else {
            return Ok(None);
        };
        Ok(Some(SlideChain { slide, post, brand }))
    }
}
