//! Handler for the workspace snapshot: a project plus every module's records.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use vlab_core::types::DbId;
use vlab_db::models::deployment::DeploymentItem;
use vlab_db::models::note::ScratchpadNote;
use vlab_db::models::prd::Prd;
use vlab_db::models::project::Project;
use vlab_db::models::prompt::PromptEntry;
use vlab_db::models::roadmap::RoadmapItem;
use vlab_db::models::secret::Secret;
use vlab_db::models::task::Task;
use vlab_db::repositories::{
    DeploymentRepo, NoteRepo, PrdRepo, PromptRepo, RoadmapRepo, SecretRepo, TaskRepo,
};
use vlab_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::owned_project;
use crate::loader::{retry_bounded, with_timeout, ModuleLoadError, MAX_LOAD_ATTEMPTS};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the workspace page renders, loaded in one request.
#[derive(Debug, Serialize)]
pub struct WorkspaceSnapshot {
    pub project: Project,
    pub prds: Vec<Prd>,
    pub roadmap: Vec<RoadmapItem>,
    pub tasks: Vec<Task>,
    pub notes: Vec<ScratchpadNote>,
    pub prompts: Vec<PromptEntry>,
    pub secrets: Vec<Secret>,
    pub deployment: Vec<DeploymentItem>,
}

/// Fetch the seven module lists concurrently, each under its own timeout.
/// The first failure fails the whole load.
pub async fn load_snapshot(
    pool: &DbPool,
    project: &Project,
    limit: Duration,
) -> Result<WorkspaceSnapshot, ModuleLoadError> {
    let id = project.id;
    let (prds, roadmap, tasks, notes, prompts, secrets, deployment) = tokio::try_join!(
        with_timeout("prd", limit, PrdRepo::list(pool, id)),
        with_timeout("roadmap", limit, RoadmapRepo::list(pool, id)),
        with_timeout("tasks", limit, TaskRepo::list(pool, id)),
        with_timeout("scratchpad", limit, NoteRepo::list(pool, id)),
        with_timeout("prompts", limit, PromptRepo::list(pool, id)),
        with_timeout("secrets", limit, SecretRepo::list(pool, id)),
        with_timeout("deployment", limit, DeploymentRepo::list(pool, id)),
    )?;

    Ok(WorkspaceSnapshot {
        project: project.clone(),
        prds,
        roadmap,
        tasks,
        notes,
        prompts,
        secrets,
        deployment,
    })
}

/// GET /api/v1/projects/{id}/workspace
pub async fn get_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkspaceSnapshot>>> {
    let project = owned_project(&state, project_id, auth.user_id).await?;
    let limit = state.config.workspace_module_timeout();

    let snapshot = retry_bounded(MAX_LOAD_ATTEMPTS, |_| {
        load_snapshot(&state.pool, &project, limit)
    })
    .await
    .map_err(|e| {
        AppError::InternalError(format!(
            "Workspace load for project {project_id} failed after {MAX_LOAD_ATTEMPTS} attempts: {e}"
        ))
    })?;

    Ok(Json(DataResponse { data: snapshot }))
}
