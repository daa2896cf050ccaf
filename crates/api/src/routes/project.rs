//! Route definitions for the `/projects` resource and the workspace modules
//! nested under it.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{deployment, note, prd, project, prompt, roadmap, secret, task, workspace};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/archive                      -> archive
/// POST   /{id}/restore                      -> restore
/// PUT    /{id}/layout                       -> update_layout
/// GET    /{id}/workspace                    -> get_workspace
///
/// GET    /{id}/prds                         -> prd::list
/// POST   /{id}/prds                         -> prd::create
/// DELETE /{id}/prds/{item_id}               -> prd::delete
///
/// GET    /{id}/roadmap                      -> roadmap::list
/// POST   /{id}/roadmap                      -> roadmap::create
/// POST   /{id}/roadmap/bulk                 -> roadmap::bulk_create
/// PUT    /{id}/roadmap/{item_id}            -> roadmap::update
/// DELETE /{id}/roadmap/{item_id}            -> roadmap::delete
///
/// (tasks and deployment mirror roadmap; notes, prompts and secrets
/// mirror prds)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/archive", post(project::archive))
        .route("/{id}/restore", post(project::restore))
        .route("/{id}/layout", put(project::update_layout))
        .route("/{id}/workspace", get(workspace::get_workspace))
        // Append-only modules.
        .route("/{id}/prds", get(prd::list).post(prd::create))
        .route("/{id}/prds/{item_id}", delete(prd::delete))
        .route("/{id}/notes", get(note::list).post(note::create))
        .route("/{id}/notes/{item_id}", delete(note::delete))
        .route("/{id}/prompts", get(prompt::list).post(prompt::create))
        .route("/{id}/prompts/{item_id}", delete(prompt::delete))
        .route("/{id}/secrets", get(secret::list).post(secret::create))
        .route("/{id}/secrets/{item_id}", delete(secret::delete))
        // Ordered modules with status updates and bulk insert.
        .route("/{id}/roadmap", get(roadmap::list).post(roadmap::create))
        .route("/{id}/roadmap/bulk", post(roadmap::bulk_create))
        .route(
            "/{id}/roadmap/{item_id}",
            put(roadmap::update).delete(roadmap::delete),
        )
        .route("/{id}/tasks", get(task::list).post(task::create))
        .route("/{id}/tasks/bulk", post(task::bulk_create))
        .route("/{id}/tasks/{item_id}", put(task::update).delete(task::delete))
        .route(
            "/{id}/deployment",
            get(deployment::list).post(deployment::create),
        )
        .route("/{id}/deployment/bulk", post(deployment::bulk_create))
        .route(
            "/{id}/deployment/{item_id}",
            put(deployment::update).delete(deployment::delete),
        )
}
