//! Authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vlab_core::error::CoreError;
use vlab_core::types::DbId;
use vlab_db::models::user::{UpsertUser, User};
use vlab_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a verified bearer token.
///
/// Use as an extractor in handler signatures to require authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> impl IntoResponse {
///     format!("Hello user {}", auth.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub claims: Claims,
}

impl AuthUser {
    /// Profile fields to provision the `users` row from.
    pub fn profile(&self) -> UpsertUser {
        let metadata = &self.claims.user_metadata;
        UpsertUser {
            id: self.user_id,
            email: self.claims.email.clone(),
            display_name: metadata.display_name().map(str::to_string),
            avatar_url: metadata.avatar_url.clone(),
            is_anonymous: self.claims.is_anonymous,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization header format".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            claims,
        })
    }
}

/// Authenticated user whose `users` row has been provisioned from the token.
///
/// Use on handlers that write rows referencing the user. The upsert refreshes
/// profile fields the provider may have changed since the last request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub auth: AuthUser,
    pub user: User,
}

impl CurrentUser {
    pub fn id(&self) -> DbId {
        self.user.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let user = UserRepo::upsert(&state.pool, &auth.profile()).await?;
        Ok(CurrentUser { auth, user })
    }
}
