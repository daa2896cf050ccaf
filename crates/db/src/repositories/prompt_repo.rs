//! Repository for the `prompts` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::prompt::{CreatePrompt, PromptEntry};

const COLUMNS: &str = "id, project_id, title, content, category, tags, created_at, updated_at";

pub struct PromptRepo;

impl PromptRepo {
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<PromptEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PromptEntry>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePrompt,
    ) -> Result<PromptEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (project_id, title, content, category, tags)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptEntry>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
