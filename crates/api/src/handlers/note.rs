//! Handlers for `/projects/{id}/notes` (scratchpad).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use vlab_core::error::CoreError;
use vlab_core::project::{validate_content, MAX_TITLE_LEN};
use vlab_core::types::DbId;
use vlab_db::models::note::{CreateNote, ScratchpadNote};
use vlab_db::repositories::NoteRepo;

use crate::error::AppResult;
use crate::handlers::{deleted_or_not_found, owned_project};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/notes
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScratchpadNote>>>> {
    owned_project(&state, project_id, auth.user_id).await?;
    let notes = NoteRepo::list(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/projects/{id}/notes
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<ScratchpadNote>>)> {
    // Notes may be untitled.
    if input.title.as_deref().is_some_and(|t| t.chars().count() > MAX_TITLE_LEN) {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LEN} characters"
        ))
        .into());
    }
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    owned_project(&state, project_id, auth.user_id).await?;

    let note = NoteRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// DELETE /api/v1/projects/{id}/notes/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_project(&state, project_id, auth.user_id).await?;
    let deleted = NoteRepo::delete(&state.pool, project_id, id).await?;
    deleted_or_not_found(deleted, "Note", id)
}
