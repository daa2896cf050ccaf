//! Integration tests for the community and rate-limit repositories.

use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;
use vlab_core::community::{build_thread, count_nodes, PageRequest, PostSort, VoteType};
use vlab_core::rate_limit::{RateLimitPolicy, RateLimiter};
use vlab_db::models::community::{CreatePost, PostFilter};
use vlab_db::models::user::UpsertUser;
use vlab_db::repositories::{CommentRepo, PgRateLimiter, PostRepo, UserRepo, VoteRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> Uuid {
    let input = UpsertUser {
        id: Uuid::new_v4(),
        display_name: Some(name.to_string()),
        ..Default::default()
    };
    UserRepo::upsert(pool, &input).await.unwrap().id
}

fn new_post(title: &str, category: &str, tags: &[&str]) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        content: format!("Body of {title}"),
        category: category.to_string(),
        tool: None,
        tip_category: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_vote_replaces_first(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let voter = new_user(&pool, "voter").await;
    let post = PostRepo::create(&pool, author, &new_post("Tips", "tips", &[])).await.unwrap();

    VoteRepo::upsert(&pool, post.id, voter, VoteType::Upvote).await.unwrap();
    VoteRepo::upsert(&pool, post.id, voter, VoteType::Downvote).await.unwrap();

    let votes = VoteRepo::list_for_post(&pool, post.id).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].vote_type, "downvote");

    let counts = VoteRepo::counts(&pool, post.id).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes, counts.score), (0, 1, -1));
    assert_eq!(
        VoteRepo::find_user_vote(&pool, post.id, voter).await.unwrap(),
        Some(VoteType::Downvote)
    );

    assert!(VoteRepo::delete(&pool, post.id, voter).await.unwrap());
    assert!(!VoteRepo::delete(&pool, post.id, voter).await.unwrap());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_comments_are_excluded_from_thread_and_counts(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let post = PostRepo::create(&pool, author, &new_post("Threads", "general", &[]))
        .await
        .unwrap();

    let c1 = CommentRepo::create(&pool, post.id, author, None, "root").await.unwrap();
    let c2 = CommentRepo::create(&pool, post.id, author, Some(c1.id), "reply").await.unwrap();
    let c3 = CommentRepo::create(&pool, post.id, author, None, "second root").await.unwrap();

    let live = CommentRepo::list_live_for_post(&pool, post.id).await.unwrap();
    let tree = build_thread(live);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].item.id, c1.id);
    assert_eq!(tree[0].replies[0].item.id, c2.id);
    assert_eq!(tree[1].item.id, c3.id);

    assert!(CommentRepo::soft_delete(&pool, c1.id).await.unwrap());
    assert!(!CommentRepo::soft_delete(&pool, c1.id).await.unwrap());

    let live = CommentRepo::list_live_for_post(&pool, post.id).await.unwrap();
    let tree = build_thread(live);
    // The orphaned reply is promoted to a root.
    assert_eq!(tree.len(), 2);
    assert_eq!(count_nodes(&tree), 2);

    let summary = PostRepo::find_published_summary(&pool, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.comment_count, 2);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_paginates_and_sorts(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let voter = new_user(&pool, "voter").await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let category = if i % 2 == 0 { "tips" } else { "showcase" };
        let post = PostRepo::create(&pool, author, &new_post(&format!("Post {i}"), category, &["rust"]))
            .await
            .unwrap();
        ids.push(post.id);
    }
    PostRepo::create(&pool, author, &new_post("100% off_topic", "tips", &[])).await.unwrap();
    VoteRepo::upsert(&pool, ids[1], voter, VoteType::Upvote).await.unwrap();

    let filter = PostFilter {
        category: Some("tips".to_string()),
        ..Default::default()
    };
    let (rows, total) = PostRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(total, 4);
    assert!(rows.iter().all(|p| p.category == "tips"));

    let filter = PostFilter {
        tag: Some("rust".to_string()),
        page: PageRequest::new(Some(2), Some(2)),
        ..Default::default()
    };
    let (rows, total) = PostRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(rows.len(), 2);

    let filter = PostFilter {
        search: Some("100%".to_string()),
        ..Default::default()
    };
    let (rows, total) = PostRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].title, "100% off_topic");

    let filter = PostFilter {
        sort: PostSort::Popular,
        ..Default::default()
    };
    let (rows, _) = PostRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(rows[0].id, ids[1]);
    assert_eq!(rows[0].upvotes, 1);
    assert_eq!(rows[0].author_name.as_deref(), Some("author"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trending_excludes_old_and_unpublished_posts(pool: PgPool) {
    let author = new_user(&pool, "author").await;
    let old = PostRepo::create(&pool, author, &new_post("Old", "tips", &[])).await.unwrap();
    let hidden = PostRepo::create(&pool, author, &new_post("Hidden", "tips", &[])).await.unwrap();
    PostRepo::create(&pool, author, &new_post("Fresh", "tips", &[])).await.unwrap();

    sqlx::query("UPDATE community_posts SET created_at = NOW() - INTERVAL '30 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE community_posts SET is_published = FALSE WHERE id = $1")
        .bind(hidden.id)
        .execute(&pool)
        .await
        .unwrap();

    let filter = PostFilter {
        sort: PostSort::Trending,
        ..Default::default()
    };
    let (rows, total) = PostRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].title, "Fresh");

    assert!(!PostRepo::is_published(&pool, hidden.id).await.unwrap());
    assert!(PostRepo::increment_views(&pool, hidden.id).await.unwrap().is_none());
    assert_eq!(PostRepo::increment_views(&pool, old.id).await.unwrap(), Some(1));
}

// ---------------------------------------------------------------------------
// Shared rate limiter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pg_rate_limiter_enforces_quota_per_key(pool: PgPool) {
    let policy = RateLimitPolicy {
        quota: 2,
        window: Duration::from_secs(60),
    };
    let limiter = PgRateLimiter::new(pool.clone(), policy, "generate");
    let other = PgRateLimiter::new(pool, policy, "generate");
    let user = Uuid::new_v4();

    assert!(limiter.check(user).await.unwrap().is_allowed());
    // A second instance shares the same counter.
    assert!(other.check(user).await.unwrap().is_allowed());
    assert!(!limiter.check(user).await.unwrap().is_allowed());
    assert!(limiter.check(Uuid::new_v4()).await.unwrap().is_allowed());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pg_rate_limiter_resets_after_window(pool: PgPool) {
    let policy = RateLimitPolicy {
        quota: 1,
        window: Duration::from_secs(60),
    };
    let limiter = PgRateLimiter::new(pool.clone(), policy, "generate");
    let user = Uuid::new_v4();

    assert!(limiter.check(user).await.unwrap().is_allowed());
    assert!(!limiter.check(user).await.unwrap().is_allowed());

    sqlx::query("UPDATE rate_limit_counters SET window_start = NOW() - INTERVAL '61 seconds'")
        .execute(&pool)
        .await
        .unwrap();

    assert!(limiter.check(user).await.unwrap().is_allowed());
    // The expired window was reset in place, not added as a second row.
    let (rows, count): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(count), 0)::BIGINT FROM rate_limit_counters")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!((rows, count), (1, 1));

    sqlx::query("UPDATE rate_limit_counters SET window_start = NOW() - INTERVAL '61 seconds'")
        .execute(&pool)
        .await
        .unwrap();
    let purged = vlab_db::repositories::RateLimitRepo::purge_expired(&pool, policy.window)
        .await
        .unwrap();
    assert_eq!(purged, 1);
}
