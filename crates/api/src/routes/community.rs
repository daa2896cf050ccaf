//! Route definitions for the community forum.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::community;
use crate::state::AppState;

/// Routes mounted at `/community`.
///
/// ```text
/// GET    /posts                             -> list_posts
/// POST   /posts                             -> create_post
/// GET    /posts/{id}                        -> get_post
/// POST   /posts/{id}/vote                   -> vote
/// DELETE /posts/{id}/vote                   -> unvote
/// POST   /posts/{id}/comments               -> create_comment
/// DELETE /comments/{id}                     -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route("/posts/{id}", get(community::get_post))
        .route(
            "/posts/{id}/vote",
            post(community::vote).delete(community::unvote),
        )
        .route("/posts/{id}/comments", post(community::create_comment))
        .route("/comments/{id}", delete(community::delete_comment))
}
