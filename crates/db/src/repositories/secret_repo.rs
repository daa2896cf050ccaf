//! Repository for the `secrets` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::secret::{CreateSecret, Secret};

const COLUMNS: &str =
    "id, project_id, name, value, environment, description, created_at, updated_at";

pub struct SecretRepo;

impl SecretRepo {
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Secret>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM secrets WHERE project_id = $1 ORDER BY environment, name"
        );
        sqlx::query_as::<_, Secret>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateSecret,
    ) -> Result<Secret, sqlx::Error> {
        let query = format!(
            "INSERT INTO secrets (project_id, name, value, environment, description)
             VALUES ($1, $2, $3, COALESCE($4, 'development'), $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Secret>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.value)
            .bind(&input.environment)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM secrets WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
