pub mod community;
pub mod generate;
pub mod health;
pub mod project;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                      current user (GET)
///
/// /generate                                LLM generation proxy (POST)
///
/// /projects                                list, create
///   /{id}                                  get, update, delete
///   /{id}/archive                          archive (POST)
///   /{id}/restore                          restore (POST)
///   /{id}/layout                           replace layout (PUT)
///   /{id}/workspace                        snapshot of all modules (GET)
///   /{id}/prds|notes|prompts|secrets       list, create
///   /{id}/prds|notes|prompts|secrets/{item_id}         delete
///   /{id}/roadmap|tasks|deployment         list, create
///   /{id}/roadmap|tasks|deployment/bulk    insert generated list (POST)
///   /{id}/roadmap|tasks|deployment/{item_id}           update, delete
///
/// /community
///   /posts                                 list (public), create
///   /posts/{id}                            get with comment tree (public)
///   /posts/{id}/vote                       vote (POST), remove vote (DELETE)
///   /posts/{id}/comments                   add comment (POST)
///   /comments/{id}                         soft delete (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me::get_me))
        .nest("/generate", generate::router())
        .nest("/projects", project::router())
        .nest("/community", community::router())
}
