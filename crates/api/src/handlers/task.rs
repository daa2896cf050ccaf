//! Handlers for `/projects/{id}/tasks`. Design tasks are tasks with a
//! `category`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::error::CoreError;
use vlab_core::project::{validate_description, validate_estimated_hours, validate_title};
use vlab_core::types::DbId;
use vlab_core::workspace::{DESIGN_CATEGORIES, TASK_PRIORITIES, TASK_STATUSES};
use vlab_db::models::task::{CreateTask, Task, UpdateTask};
use vlab_db::repositories::TaskRepo;

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
    description: Option<&str>,
    estimated_hours: Option<f64>,
) -> Result<(), CoreError> {
    validate_optional_enum("status", status, TASK_STATUSES)?;
    validate_optional_enum("priority", priority, TASK_PRIORITIES)?;
    if let Some(d) = description {
        validate_description(d)?;
    }
    if let Some(hours) = estimated_hours {
        validate_estimated_hours(hours)?;
    }
    Ok(())
}

fn validate_create(input: &CreateTask) -> Result<(), CoreError> {
    validate_title(&input.title)?;
    validate_optional_enum("category", input.category.as_deref(), DESIGN_CATEGORIES)?;
    validate_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.description.as_deref(),
        input.estimated_hours,
    )
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let tasks = TaskRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/projects/{id}/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate_create(&input)?;
    owned_project(&state, project_id, auth.user_id).await?;
    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// POST /api/v1/projects/{id}/tasks/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<BulkInsert<CreateTask>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Task>>>)> {
    let items = input.checked_items()?;
    for item in items {
        validate_create(item)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let created = TaskRepo::insert_many(&state.pool, project_id, items).await?;
    tracing::info!(project_id = %project_id, count = created.len(), "Tasks inserted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/projects/{id}/tasks/{item_id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_fields(
        input.status.as_deref(),
        input.priority.as_deref(),
        input.description.as_deref(),
        input.estimated_hours,
    )?;
    owned_project(&state, project_id, auth.user_id).await?;

    let task = TaskRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Task", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/projects/{id}/tasks/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = TaskRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "Task", id)
}
