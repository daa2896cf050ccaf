//! Repository for the `community_comments` table.

use sqlx::PgPool;
use vlab_core::types::DbId;

use crate::models::community::{Comment, CommentWithAuthor};

const COLUMNS: &str =
    "id, post_id, author_id, parent_comment_id, content, is_deleted, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Non-deleted comments on a post in creation order, with author names.
    pub async fn list_live_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.author_id, u.display_name AS author_name, \
                    c.parent_comment_id, c.content, c.created_at, c.updated_at \
             FROM community_comments c \
             LEFT JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 AND NOT c.is_deleted \
             ORDER BY c.created_at, c.id",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM community_comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        post_id: DbId,
        author_id: DbId,
        parent_comment_id: Option<DbId>,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_comments (post_id, author_id, parent_comment_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(author_id)
            .bind(parent_comment_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Mark a comment deleted. Returns `true` if a live comment was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE community_comments SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
