//! Handlers for `/projects/{id}/prds`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::project::{validate_content, validate_title};
use vlab_core::types::DbId;
use vlab_db::models::prd::{CreatePrd, Prd};
use vlab_db::repositories::PrdRepo;

use crate::error::AppResult;
use crate::handlers::{deleted_or_not_found, owned_project};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/prds
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Prd>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let prds = PrdRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: prds }))
}

/// POST /api/v1/projects/{id}/prds
///
/// Each save creates a new version.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreatePrd>,
) -> AppResult<(StatusCode, Json<DataResponse<Prd>>)> {
    validate_title(&input.title)?;
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let prd = PrdRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: prd })))
}

/// DELETE /api/v1/projects/{id}/prds/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = PrdRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "Prd", id)
}
