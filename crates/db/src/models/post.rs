use carousel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub project_id: DbId,
    pub raw_post_text: String,
    pub content_type: String,
    pub status: String,
    pub caption: Option<String>,
    pub hashtags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub project_id: DbId,
    pub raw_post_text: String,
    pub content_type: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}
