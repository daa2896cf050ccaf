//! Handlers for `/projects/{id}/deployment`, the deployment checklist.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::error::CoreError;
use vlab_core::project::{validate_description, validate_title};
use vlab_core::types::DbId;
use vlab_core::workspace::{
    resolve_platform, DEPLOYMENT_CATEGORIES, DEPLOYMENT_PLATFORMS, ROADMAP_PRIORITIES,
};
use vlab_db::models::deployment::{
    CreateDeploymentItem, DeploymentItem, UpdateDeploymentItem,
};
use vlab_db::repositories::DeploymentRepo;

use crate::error::AppResult;
use crate::handlers::{
    deleted_or_not_found, not_found, owned_project, validate_optional_enum, BulkInsert,
};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate a new checklist step and canonicalise its platform.
fn prepare_create(input: &mut CreateDeploymentItem) -> Result<(), CoreError> {
    validate_title(&input.title)?;
    validate_optional_enum("category", input.category.as_deref(), DEPLOYMENT_CATEGORIES)?;
    validate_optional_enum("priority", input.priority.as_deref(), ROADMAP_PRIORITIES)?;
    if let Some(d) = &input.description {
        validate_description(d)?;
    }
    if let Some(raw) = input.platform.take() {
        let platform = resolve_platform(&raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid platform '{raw}'. Must be one of: {}",
                DEPLOYMENT_PLATFORMS.join(", ")
            ))
        })?;
        input.platform = Some(platform.to_string());
    }
    Ok(())
}

/// GET /api/v1/projects/{id}/deployment
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DeploymentItem>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let items = DeploymentRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/projects/{id}/deployment
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateDeploymentItem>,
) -> AppResult<(StatusCode, Json<DataResponse<DeploymentItem>>)> {
    prepare_create(&mut input)?;
    owned_project(&state, project_id, auth.user_id).await?;
    let item = DeploymentRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/projects/{id}/deployment/bulk
pub async fn bulk_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<BulkInsert<CreateDeploymentItem>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<DeploymentItem>>>)> {
    input.checked_items()?;
    for item in &mut input.items {
        prepare_create(item)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let created = DeploymentRepo::insert_many(&state.pool, project_id, &input.items).await?;
    tracing::info!(project_id = %project_id, count = created.len(), "Deployment steps inserted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/projects/{id}/deployment/{item_id}
///
/// Typically used to check a step off.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDeploymentItem>,
) -> AppResult<Json<DataResponse<DeploymentItem>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(d) = &input.description {
        validate_description(d)?;
    }
    validate_optional_enum("priority", input.priority.as_deref(), ROADMAP_PRIORITIES)?;
    owned_project(&state, project_id, auth.user_id).await?;

    let item = DeploymentRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("DeploymentItem", id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/projects/{id}/deployment/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = DeploymentRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "DeploymentItem", id)
}
