//! Community forum models: posts, comments and votes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::community::{PageRequest, PostSort, Threaded};
use vlab_core::types::{DbId, Timestamp};

/// A row from the `community_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A published post joined with its author and aggregate counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: DbId,
    pub author_id: DbId,
    pub author_name: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    pub tags: Vec<String>,
    pub view_count: i32,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
    pub comment_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Sanitised input for a new post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    pub tags: Vec<String>,
}

/// Filters for the post listing. Text filters are already sanitised.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub sort: PostSort,
    pub page: PageRequest,
}

/// A row from the `community_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub parent_comment_id: Option<DbId>,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A live comment joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub author_name: Option<String>,
    pub parent_comment_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Threaded for CommentWithAuthor {
    fn thread_id(&self) -> DbId {
        self.id
    }

    fn thread_parent_id(&self) -> Option<DbId> {
        self.parent_comment_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub parent_comment_id: Option<DbId>,
}

/// A row from the `community_votes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub post_id: DbId,
    pub user_id: DbId,
    pub vote_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Vote tallies for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct VoteCounts {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}
