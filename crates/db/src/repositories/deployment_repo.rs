//! Repository for the `deployment_items` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use super::next_position;
use crate::models::deployment::{CreateDeploymentItem, DeploymentItem, UpdateDeploymentItem};

const COLUMNS: &str = "id, project_id, title, description, category, platform, priority, \
                       is_completed, position, created_at, updated_at";

const INSERT: &str = "INSERT INTO deployment_items \
                      (project_id, title, description, category, platform, priority, position) \
                      VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 'pre_deployment'), \
                              COALESCE($5, 'universal'), COALESCE($6, 'medium'), $7)";

pub struct DeploymentRepo;

impl DeploymentRepo {
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DeploymentItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deployment_items WHERE project_id = $1 ORDER BY position, created_at"
        );
        sqlx::query_as::<_, DeploymentItem>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateDeploymentItem,
    ) -> Result<DeploymentItem, sqlx::Error> {
        let mut items = Self::insert_many(pool, project_id, std::slice::from_ref(input)).await?;
        items.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Insert a checklist in one transaction, positions appended in order.
    pub async fn insert_many(
        pool: &PgPool,
        project_id: DbId,
        inputs: &[CreateDeploymentItem],
    ) -> Result<Vec<DeploymentItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let base = next_position(&mut *tx, "deployment_items", project_id).await?;
        let query = format!("{INSERT} RETURNING {COLUMNS}");

        let mut results = Vec::with_capacity(inputs.len());
        for (offset, input) in (0i32..).zip(inputs) {
            let row = sqlx::query_as::<_, DeploymentItem>(&query)
                .bind(project_id)
                .bind(&input.title)
                .bind(&input.description)
                .bind(&input.category)
                .bind(&input.platform)
                .bind(&input.priority)
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
        input: &UpdateDeploymentItem,
    ) -> Result<Option<DeploymentItem>, sqlx::Error> {
        let query = format!(
            "UPDATE deployment_items SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                is_completed = COALESCE($6, is_completed)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeploymentItem>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.is_completed)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deployment_items WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
