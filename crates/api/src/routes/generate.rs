//! Route definitions for the generation proxy.

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// Routes mounted at `/generate`.
///
/// ```text
/// POST   /                                  -> generate
/// ```
///
/// Preflight `OPTIONS` is answered by the CORS layer; other methods get 405.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate::generate))
}
