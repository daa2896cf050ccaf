//! Repository for the `community_posts` table.

use sqlx::PgPool;
use vlab_core::community::{PostSort, TRENDING_WINDOW_DAYS};
use vlab_core::sanitize::like_pattern;
use vlab_core::types::DbId;

use crate::models::community::{CreatePost, Post, PostFilter, PostSummary};

const COLUMNS: &str = "id, author_id, title, content, category, tool, tip_category, tags, \
                       is_published, view_count, created_at, updated_at";

/// Summary projection: post columns, author name and vote/comment aggregates.
const SUMMARY_SELECT: &str = "SELECT \
        p.id, p.author_id, u.display_name AS author_name, \
        p.title, p.content, p.category, p.tool, p.tip_category, p.tags, p.view_count, \
        v.upvotes, v.downvotes, v.upvotes - v.downvotes AS score, \
        c.comment_count, p.created_at, p.updated_at \
     FROM community_posts p \
     LEFT JOIN users u ON u.id = p.author_id \
     CROSS JOIN LATERAL ( \
        SELECT COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes, \
               COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes \
        FROM community_votes WHERE post_id = p.id \
     ) v \
     CROSS JOIN LATERAL ( \
        SELECT COUNT(*) AS comment_count \
        FROM community_comments WHERE post_id = p.id AND NOT is_deleted \
     ) c";

pub struct PostRepo;

impl PostRepo {
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_posts (author_id, title, content, category, tool, tip_category, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(author_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.tool)
            .bind(&input.tip_category)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    /// List one page of published posts matching `filter`, plus the total
    /// number of matches across all pages.
    pub async fn list(
        pool: &PgPool,
        filter: &PostFilter,
    ) -> Result<(Vec<PostSummary>, i64), sqlx::Error> {
        // Build dynamic WHERE clauses. Every bound value is text.
        let mut conditions = vec!["p.is_published".to_string()];
        let mut binds: Vec<String> = Vec::new();
        let mut bind_idx = 1u32;

        for (column, value) in [
            ("p.category", &filter.category),
            ("p.tool", &filter.tool),
            ("p.tip_category", &filter.tip_category),
        ] {
            if let Some(value) = value {
                conditions.push(format!("{column} = ${bind_idx}"));
                binds.push(value.clone());
                bind_idx += 1;
            }
        }
        if let Some(ref search) = filter.search {
            conditions.push(format!(
                "(p.title ILIKE ${bind_idx} OR p.content ILIKE ${bind_idx})"
            ));
            binds.push(like_pattern(search));
            bind_idx += 1;
        }
        if let Some(ref tag) = filter.tag {
            conditions.push(format!("${bind_idx} = ANY(p.tags)"));
            binds.push(tag.clone());
            bind_idx += 1;
        }
        if filter.sort == PostSort::Trending {
            conditions.push(format!(
                "p.created_at >= NOW() - INTERVAL '{TRENDING_WINDOW_DAYS} days'"
            ));
        }

        let where_clause = conditions.join(" AND ");

        let count_query =
            format!("SELECT COUNT(*) FROM community_posts p WHERE {where_clause}");
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for value in &binds {
            count = count.bind(value);
        }
        let total = count.fetch_one(pool).await?;

        let query = format!(
            "{SUMMARY_SELECT} WHERE {where_clause} ORDER BY {order} LIMIT ${bind_idx} OFFSET ${next_idx}",
            order = filter.sort.order_by(),
            next_idx = bind_idx + 1,
        );
        let mut q = sqlx::query_as::<_, PostSummary>(&query);
        for value in &binds {
            q = q.bind(value);
        }
        let rows = q
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Find a published post with its aggregates. Unpublished posts are `None`.
    pub async fn find_published_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PostSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE p.id = $1 AND p.is_published");
        sqlx::query_as::<_, PostSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `true` if the post exists and is published.
    pub async fn is_published(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM community_posts WHERE id = $1 AND is_published)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Bump the view counter, returning the new value.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE community_posts SET view_count = view_count + 1
             WHERE id = $1 AND is_published
             RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
