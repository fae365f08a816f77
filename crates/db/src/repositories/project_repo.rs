//! Repository for the `projects` table.

use carousel_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::Project;

const COLUMNS: &str = "id, brand_id, name, created_at, updated_at";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project under a brand.
    pub async fn create(pool: &PgPool, brand_id: DbId, name: &str) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (brand_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(brand_id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
