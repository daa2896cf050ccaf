//! Handlers for `/projects/{id}/prompts`, the saved prompt library.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::community::normalize_tags;
use vlab_core::project::{validate_content, validate_title};
use vlab_core::types::DbId;
use vlab_db::models::prompt::{CreatePrompt, PromptEntry};
use vlab_db::repositories::PromptRepo;

use crate::error::AppResult;
use crate::handlers::{deleted_or_not_found, owned_project};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/prompts
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PromptEntry>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let prompts = PromptRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: prompts }))
}

/// POST /api/v1/projects/{id}/prompts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreatePrompt>,
) -> AppResult<(StatusCode, Json<DataResponse<PromptEntry>>)> {
    validate_title(&input.title)?;
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    input.tags = normalize_tags(&input.tags)?;
    owned_project(&state, project_id, auth.user_id).await?;

    let prompt = PromptRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: prompt })))
}

/// DELETE /api/v1/projects/{id}/prompts/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = PromptRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "Prompt", id)
}
