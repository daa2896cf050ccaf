//! Handlers for `/projects/{id}/roadmap`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::error::CoreError;
use vlab_core::project::{validate_description, validate_title};
use vlab_core::types::DbId;
use vlab_core::workspace::{ROADMAP_PHASES, ROADMAP_PRIORITIES, ROADMAP_STATUSES};
use vlab_db::models::roadmap::{CreateRoadmapItem, RoadmapItem, UpdateRoadmapItem};
use vlab_db::repositories::RoadmapRepo;

use crate::error::AppResult;
use crate::handlers::{
    deleted_or_not_found, not_found, owned_project, validate_optional_enum, BulkInsert,
};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_fields(
    status: Option<&str>,
    priority: Option<&str>,
    phase: Option<&str>,
    description: Option<&str>,
) -> Result<(), CoreError> {
    validate_optional_enum("status", status, ROADMAP_STATUSES)?;
    validate_optional_enum("priority", priority, ROADMAP_PRIORITIES)?;
    validate_optional_enum("phase", phase, ROADMAP_PHASES)?;
    if let Some(d) = description {
        validate_description(d)?;
    }
    Ok(())
}

fn validate_create(input: &CreateRoadmapItem) -> Result<(), CoreError> {
    validate_title(&input.title)?;
    validate_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.phase.as_deref(),
        input.description.as_deref(),
    )
}

/// GET /api/v1/projects/{id}/roadmap
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RoadmapItem>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let items = RoadmapRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/projects/{id}/roadmap
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRoadmapItem>,
) -> AppResult<(StatusCode, Json<DataResponse<RoadmapItem>>)> {
    validate_create(&input)?;
    owned_project(&state, project_id, auth.user_id).await?;
    let item = RoadmapRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/projects/{id}/roadmap/bulk
///
/// Appends a generated roadmap after the existing items in one transaction.
pub async fn bulk_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<BulkInsert<CreateRoadmapItem>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<RoadmapItem>>>)> {
    let items = input.checked_items()?;
    for item in items {
        validate_create(item)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let created = RoadmapRepo::insert_many(&state.pool, project_id, items).await?;
    tracing::info!(project_id = %project_id, count = created.len(), "Roadmap items inserted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/projects/{id}/roadmap/{item_id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRoadmapItem>,
) -> AppResult<Json<DataResponse<RoadmapItem>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.phase.as_deref(),
        input.description.as_deref(),
    )?;
    owned_project(&state, project_id, auth.user_id).await?;

    let item = RoadmapRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("RoadmapItem", id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/projects/{id}/roadmap/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = RoadmapRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "RoadmapItem", id)
}
