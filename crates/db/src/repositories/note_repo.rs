//! Repository for the `scratchpad_notes` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::note::{CreateNote, ScratchpadNote};

const COLUMNS: &str = "id, project_id, title, content, color, is_pinned, created_at, updated_at";

pub struct NoteRepo;

impl NoteRepo {
    /// Pinned notes first, then most recently edited.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<ScratchpadNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scratchpad_notes WHERE project_id = $1
             ORDER BY is_pinned DESC, updated_at DESC"
        );
        sqlx::query_as::<_, ScratchpadNote>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateNote,
    ) -> Result<ScratchpadNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO scratchpad_notes (project_id, title, content, color, is_pinned)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4, COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScratchpadNote>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.color)
            .bind(input.is_pinned)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scratchpad_notes WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
