//! Repository for the `prds` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::prd::{CreatePrd, Prd};

const COLUMNS: &str = "id, project_id, title, content, version, created_at, updated_at";

pub struct PrdRepo;

impl PrdRepo {
    /// List a project's PRDs, latest version first.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Prd>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prds WHERE project_id = $1 ORDER BY version DESC, created_at DESC"
        );
        sqlx::query_as::<_, Prd>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a PRD as the next version for the project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePrd,
    ) -> Result<Prd, sqlx::Error> {
        let query = format!(
            "INSERT INTO prds (project_id, title, content, version)
             VALUES ($1, $2, COALESCE($3, ''),
                     (SELECT COALESCE(MAX(version), 0) + 1 FROM prds WHERE project_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prd>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prds WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
