//! Repository for the `community_votes` table.

use sqlx::PgPool;
use vlab_core::community::VoteType;
use vlab_core::types::DbId;

use crate::models::community::{Vote, VoteCounts};

const COLUMNS: &str = "id, post_id, user_id, vote_type, created_at, updated_at";

pub struct VoteRepo;

impl VoteRepo {
    /// Record the user's vote on a post, replacing any earlier vote.
    ///
    /// Uses `ON CONFLICT (post_id, user_id) DO UPDATE` to guarantee one row
    /// per user and post.
    pub async fn upsert(
        pool: &PgPool,
        post_id: DbId,
        user_id: DbId,
        vote_type: VoteType,
    ) -> Result<Vote, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_votes (post_id, user_id, vote_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (post_id, user_id) DO UPDATE \
             SET vote_type = EXCLUDED.vote_type \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vote>(&query)
            .bind(post_id)
            .bind(user_id)
            .bind(vote_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// Remove the user's vote. Returns `true` if a vote existed.
    pub async fn delete(pool: &PgPool, post_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM community_votes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Vote>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM community_votes WHERE post_id = $1 ORDER BY created_at");
        sqlx::query_as::<_, Vote>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    pub async fn counts(pool: &PgPool, post_id: DbId) -> Result<VoteCounts, sqlx::Error> {
        sqlx::query_as::<_, VoteCounts>(
            "SELECT \
                COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes, \
                COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes, \
                COUNT(*) FILTER (WHERE vote_type = 'upvote') \
                  - COUNT(*) FILTER (WHERE vote_type = 'downvote') AS score \
             FROM community_votes WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await
    }

    /// The user's current vote on the post, if any.
    pub async fn find_user_vote(
        pool: &PgPool,
        post_id: DbId,
        user_id: DbId,
    ) -> Result<Option<VoteType>, sqlx::Error> {
        let raw = sqlx::query_scalar::<_, String>(
            "SELECT vote_type FROM community_votes WHERE post_id = $1 AND user_id = $2",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(raw.and_then(|v| VoteType::parse(&v).ok()))
    }
}
