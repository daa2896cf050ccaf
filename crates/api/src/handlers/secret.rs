//! Handlers for `/projects/{id}/secrets`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::project::{validate_description, validate_secret_name};
use vlab_core::types::DbId;
use vlab_core::workspace::SECRET_ENVIRONMENTS;
use vlab_db::models::secret::{CreateSecret, Secret};
use vlab_db::repositories::SecretRepo;

use crate::error::AppResult;
use crate::handlers::{deleted_or_not_found, owned_project, validate_optional_enum};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/secrets
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Secret>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let secrets = SecretRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: secrets }))
}

/// POST /api/v1/projects/{id}/secrets
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateSecret>,
) -> AppResult<(StatusCode, Json<DataResponse<Secret>>)> {
    validate_secret_name(&input.name)?;
    validate_optional_enum("environment", input.environment.as_deref(), SECRET_ENVIRONMENTS)?;
    if let Some(description) = &input.description {
        validate_description(description)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let secret = SecretRepo::create(&state.pool, project_id, &input).await?;
    // Never log the value.
    tracing::info!(project_id = %project_id, secret_id = %secret.id, "Secret stored");
    Ok((StatusCode::CREATED, Json(DataResponse { data: secret })))
}

/// DELETE /api/v1/projects/{id}/secrets/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = SecretRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "Secret", id)
}
