//! Handler for the `/me` resource.

use axum::Json;
use vlab_db::models::user::User;

use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;

/// GET /api/v1/me
///
/// Returns the caller's user row, provisioning it from the token on first use.
pub async fn get_me(current: CurrentUser) -> Json<DataResponse<User>> {
    Json(DataResponse { data: current.user })
}
