//! Handlers for the `/projects` resource.
//!
//! Every query is scoped to the caller as owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::project::{validate_description, validate_project_name};
use vlab_core::types::DbId;
use vlab_core::workspace::{default_layout, validate_layout, WorkspaceLayout};
use vlab_db::models::project::{CreateProject, Project, UpdateProject};
use vlab_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::handlers::{deleted_or_not_found, not_found};
use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::query::IncludeArchivedParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<IncludeArchivedParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects =
        ProjectRepo::list_for_owner(&state.pool, auth.user_id, params.include_archived).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_project_name(&input.name)?;
    if let Some(description) = &input.description {
        validate_description(description)?;
    }

    let project = ProjectRepo::create(&state.pool, current.id(), &input, &default_layout()).await?;
    tracing::info!(project_id = %project.id, user_id = %current.id(), "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(name) = &input.name {
        validate_project_name(name)?;
    }
    if let Some(description) = &input.description {
        validate_description(description)?;
    }

    let project = ProjectRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Hard delete; module records cascade.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id, auth.user_id).await?;
    if deleted {
        tracing::info!(project_id = %id, user_id = %auth.user_id, "Project deleted");
    }
    deleted_or_not_found(deleted, "Project", id)
}

/// POST /api/v1/projects/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    set_archived(&state, auth.user_id, id, true).await
}

/// POST /api/v1/projects/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    set_archived(&state, auth.user_id, id, false).await
}

async fn set_archived(
    state: &AppState,
    owner_id: DbId,
    id: DbId,
    archived: bool,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::set_archived(&state.pool, id, owner_id, archived)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}/layout
pub async fn update_layout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(layout): Json<WorkspaceLayout>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate_layout(&layout)?;
    let project = ProjectRepo::update_layout(&state.pool, id, auth.user_id, &layout)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}
