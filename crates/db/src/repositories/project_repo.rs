//! Repository for the `projects` table.
//!
//! Every query is scoped to the owning user; a project owned by someone
//! else behaves exactly like a missing one.

use sqlx::types::Json;
use sqlx::PgPool;
use vlab_core::types::DbId;
use vlab_core::workspace::WorkspaceLayout;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, owner_id, name, description, is_archived, workspace_layout, created_at, updated_at";

/// Provides owner-scoped CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with the given initial layout.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
        layout: &WorkspaceLayout,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, name, description, workspace_layout)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(Json(layout))
            .fetch_one(pool)
            .await
    }

    /// Find a project owned by `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's projects, newest first. Archived projects are
    /// included only when asked for.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        include_archived: bool,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1 AND ($2 OR NOT is_archived)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(include_archived)
            .fetch_all(pool)
            .await
    }

    /// Update name and/or description. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Archive (`true`) or restore (`false`) a project.
    pub async fn set_archived(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        archived: bool,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET is_archived = $3
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(archived)
            .fetch_optional(pool)
            .await
    }

    /// Replace the project's workspace layout.
    pub async fn update_layout(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        layout: &WorkspaceLayout,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET workspace_layout = $3
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(Json(layout))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project and, by cascade, its module records.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
