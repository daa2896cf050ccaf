//! Repository for the `roadmap_items` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use super::next_position;
use crate::models::roadmap::{CreateRoadmapItem, RoadmapItem, UpdateRoadmapItem};

const COLUMNS: &str = "id, project_id, title, description, status, priority, phase, position, \
                       created_at, updated_at";

const INSERT: &str = "INSERT INTO roadmap_items \
                      (project_id, title, description, status, priority, phase, position) \
                      VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 'planned'), \
                              COALESCE($5, 'medium'), COALESCE($6, 'development'), $7)";

pub struct RoadmapRepo;

impl RoadmapRepo {
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<RoadmapItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM roadmap_items WHERE project_id = $1 ORDER BY position, created_at"
        );
        sqlx::query_as::<_, RoadmapItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Append one item after the project's existing items.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRoadmapItem,
    ) -> Result<RoadmapItem, sqlx::Error> {
        let mut items = Self::insert_many(pool, project_id, std::slice::from_ref(input)).await?;
        items.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Insert a list of items in one transaction, positions appended in order.
    pub async fn insert_many(
        pool: &PgPool,
        project_id: DbId,
        inputs: &[CreateRoadmapItem],
    ) -> Result<Vec<RoadmapItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let base = next_position(&mut *tx, "roadmap_items", project_id).await?;
        let query = format!("{INSERT} RETURNING {COLUMNS}");

        let mut results = Vec::with_capacity(inputs.len());
        for (offset, input) in (0i32..).zip(inputs) {
            let row = sqlx::query_as::<_, RoadmapItem>(&query)
                .bind(project_id)
                .bind(&input.title)
                .bind(&input.description)
                .bind(&input.status)
                .bind(&input.priority)
                .bind(&input.phase)
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
        input: &UpdateRoadmapItem,
    ) -> Result<Option<RoadmapItem>, sqlx::Error> {
        let query = format!(
            "UPDATE roadmap_items SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                phase = COALESCE($7, phase)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RoadmapItem>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(&input.phase)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roadmap_items WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
