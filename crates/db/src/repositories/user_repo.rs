//! Repository for the `users` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::user::{UpsertUser, User};

const COLUMNS: &str = "id, email, display_name, avatar_url, is_anonymous, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert or refresh a user from token claims.
    ///
    /// Profile fields missing from the token keep their stored value.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email, display_name, avatar_url, is_anonymous) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE \
             SET email = COALESCE(EXCLUDED.email, users.email), \
                 display_name = COALESCE(EXCLUDED.display_name, users.display_name), \
                 avatar_url = COALESCE(EXCLUDED.avatar_url, users.avatar_url), \
                 is_anonymous = EXCLUDED.is_anonymous \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.avatar_url)
            .bind(input.is_anonymous)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
