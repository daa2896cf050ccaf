//! User model. Rows are provisioned from auth token claims.

use serde::Serialize;
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_anonymous: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields taken from a verified token.
#[derive(Debug, Clone, Default)]
pub struct UpsertUser {
    pub id: DbId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_anonymous: bool,
}
