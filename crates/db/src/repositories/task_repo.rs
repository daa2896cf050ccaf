//! Repository for the `tasks` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use super::next_position;
use crate::models::task::{CreateTask, Task, UpdateTask};

const COLUMNS: &str = "id, project_id, title, description, status, priority, estimated_hours, \
                       category, position, created_at, updated_at";

const INSERT: &str = "INSERT INTO tasks \
                      (project_id, title, description, status, priority, estimated_hours, category, position) \
                      VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 'todo'), \
                              COALESCE($5, 'medium'), $6, $7, $8)";

pub struct TaskRepo;

impl TaskRepo {
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY position, created_at"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let mut tasks = Self::insert_many(pool, project_id, std::slice::from_ref(input)).await?;
        tasks.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Insert a list of tasks in one transaction, positions appended in order.
    pub async fn insert_many(
        pool: &PgPool,
        project_id: DbId,
        inputs: &[CreateTask],
    ) -> Result<Vec<Task>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let base = next_position(&mut *tx, "tasks", project_id).await?;
        let query = format!("{INSERT} RETURNING {COLUMNS}");

        let mut results = Vec::with_capacity(inputs.len());
        for (offset, input) in (0i32..).zip(inputs) {
            let row = sqlx::query_as::<_, Task>(&query)
                .bind(project_id)
                .bind(&input.title)
                .bind(&input.description)
                .bind(&input.status)
                .bind(&input.priority)
                .bind(input.estimated_hours)
                .bind(&input.category)
                .bind(base + offset)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                estimated_hours = COALESCE($7, estimated_hours)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.estimated_hours)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
