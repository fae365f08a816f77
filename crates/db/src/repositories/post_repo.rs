//! Repository for the `posts` table.

use carousel_core::content_type::validate_content_type;
use carousel_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post};
use crate::DbError;

const COLUMNS: &str =
    "id, project_id, raw_post_text, content_type, status, caption, hashtags, created_at, updated_at";

pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row. The content type must
    /// be one of the known values.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, DbError> {
        validate_content_type(&input.content_type)?;
        let query = format!(
            "INSERT INTO posts (project_id, raw_post_text, content_type, caption, hashtags)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(input.project_id)
            .bind(&input.raw_post_text)
            .bind(&input.content_type)
            .bind(&input.caption)
            .bind(Json(&input.hashtags))
            .fetch_one(pool)
            .await?;
        Ok(post)
    }

    /// Find a post by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
