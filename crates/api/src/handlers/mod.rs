pub mod community;
pub mod deployment;
pub mod generate;
pub mod me;
pub mod note;
pub mod prd;
pub mod project;
pub mod prompt;
pub mod roadmap;
pub mod secret;
pub mod task;
pub mod workspace;

use axum::http::StatusCode;
use serde::Deserialize;
use vlab_core::error::CoreError;
use vlab_core::normalize::MAX_GENERATED_ITEMS;
use vlab_core::types::DbId;
use vlab_core::workspace::validate_enum;
use vlab_db::models::project::Project;
use vlab_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of the `.../bulk` endpoints: a normalised generated list.
#[derive(Debug, Deserialize)]
pub struct BulkInsert<T> {
    pub items: Vec<T>,
}

impl<T> BulkInsert<T> {
    /// Reject empty lists and lists longer than one generation can produce.
    pub fn checked_items(&self) -> Result<&[T], CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::Validation("items must not be empty".into()));
        }
        if self.items.len() > MAX_GENERATED_ITEMS {
            return Err(CoreError::Validation(format!(
                "At most {MAX_GENERATED_ITEMS} items can be inserted at once"
            )));
        }
        Ok(&self.items)
    }
}

/// Load a project owned by the caller. Other users' projects are reported
/// as missing.
pub(crate) async fn owned_project(
    state: &AppState,
    project_id: DbId,
    owner_id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_owned(&state.pool, project_id, owner_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
}

/// Validate an enum field only when it was supplied.
pub(crate) fn validate_optional_enum(
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_enum(field, v, allowed),
        None => Ok(()),
    }
}

/// Map a delete's "row existed" flag to 204 or 404.
pub(crate) fn deleted_or_not_found(
    deleted: bool,
    entity: &'static str,
    id: DbId,
) -> AppResult<StatusCode> {
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity, id }))
    }
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
