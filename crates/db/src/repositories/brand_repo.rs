//! Repository for the `brands` and `brand_examples` tables.

use carousel_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::brand::{Brand, BrandExample, CreateBrand};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, palette, heading_font, body_font, visual_tone, do_rules, \
    dont_rules, style_guide, template_sets_dirty, template_sets_dirty_count, \
    template_sets_updated_at, created_at, updated_at";

/// Provides CRUD operations for brands.
pub struct BrandRepo;

impl BrandRepo {
    /// Insert a new brand, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBrand) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands
                (name, palette, heading_font, body_font, visual_tone, do_rules, dont_rules)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(&input.name)
            .bind(Json(&input.palette))
            .bind(&input.heading_font)
            .bind(&input.body_font)
            .bind(&input.visual_tone)
            .bind(&input.do_rules)
            .bind(&input.dont_rules)
            .fetch_one(pool)
            .await
    }

    /// Find a brand by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store a freshly derived style guide and clear the staleness tracking
    /// fields.
    pub async fn store_style_guide(
        pool: &PgPool,
        id: DbId,
        style_guide: &serde_json::Value,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!(
            "UPDATE brands
             SET style_guide = $2,
                 template_sets_dirty = FALSE,
                 template_sets_dirty_count = 0,
                 template_sets_updated_at = now(),
                 updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(style_guide)
            .fetch_optional(pool)
            .await
    }

    /// Mark the derived style guide stale (called when brand examples change).
    pub async fn mark_style_guide_dirty(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE brands
             SET template_sets_dirty = TRUE,
                 template_sets_dirty_count = template_sets_dirty_count + 1,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List a brand's example posts, newest first.
    pub async fn list_examples(
        pool: &PgPool,
        brand_id: DbId,
    ) -> Result<Vec<BrandExample>, sqlx::Error> {
        sqlx::query_as::<_, BrandExample>(
            "SELECT id, brand_id, image_url, notes, created_at
             FROM brand_examples
             WHERE brand_id = $1
             ORDER BY created_at DESC",
        )
        .bind(brand_id)
        .fetch_all(pool)
        .await
    }

    /// Attach an example image to a brand.
    pub async fn add_example(
        pool: &PgPool,
        brand_id: DbId,
        image_url: &str,
        notes: Option<&str>,
    ) -> Result<BrandExample, sqlx::Error> {
        sqlx::query_as::<_, BrandExample>(
            "INSERT INTO brand_examples (brand_id, image_url, notes)
             VALUES ($1, $2, $3)
             RETURNING id, brand_id, image_url, notes, created_at",
        )
        .bind(brand_id)
        .bind(image_url)
        .bind(notes)
        .fetch_one(pool)
        .await
    }
}
