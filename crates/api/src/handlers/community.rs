//! Handlers for the community forum: posts, threaded comments and votes.
//!
//! Listing and reading posts is public. Writing requires a signed-in user.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vlab_core::community::{
    build_thread, count_nodes, normalize_tags, sanitize_comment, sanitize_label,
    sanitize_post_content, sanitize_post_title, tag_filter, PageInfo, PageRequest, PostSort,
    ThreadNode, VoteType,
};
use vlab_core::error::CoreError;
use vlab_core::types::DbId;
use vlab_db::models::community::{
    Comment, CommentWithAuthor, CreateComment, CreatePost, Post, PostFilter, PostSummary,
    VoteCounts,
};
use vlab_db::repositories::{CommentRepo, PostRepo, VoteRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::not_found;
use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::query::PostListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Request body for a new post.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: String,
}

/// Vote tallies plus the caller's current vote.
#[derive(Debug, Serialize)]
pub struct VoteSummary {
    #[serde(flatten)]
    pub counts: VoteCounts,
    pub user_vote: Option<VoteType>,
}

/// A published post with its comment tree.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub comments: Vec<ThreadNode<CommentWithAuthor>>,
}

/// Build a [`PostFilter`] from raw query values.
pub fn post_filter(params: &PostListParams) -> Result<PostFilter, CoreError> {
    Ok(PostFilter {
        category: sanitize_label(params.category.as_deref()),
        tool: sanitize_label(params.tool.as_deref()),
        tip_category: sanitize_label(params.tip_category.as_deref()),
        search: sanitize_label(params.search.as_deref()),
        tag: tag_filter(params.tag.as_deref()),
        sort: PostSort::parse(params.sort.as_deref())?,
        page: PageRequest::new(params.page, params.limit),
    })
}

/// GET /api/v1/community/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> AppResult<Json<PagedResponse<PostSummary>>> {
    let filter = post_filter(&params)?;
    let (posts, total) = PostRepo::list(&state.pool, &filter).await?;
    Ok(Json(PagedResponse {
        data: posts,
        pagination: PageInfo::new(filter.page, total),
    }))
}

/// POST /api/v1/community/posts
pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Post>>)> {
    let category = sanitize_label(Some(&input.category))
        .ok_or_else(|| CoreError::Validation("category must not be empty".into()))?;

    let post = CreatePost {
        title: sanitize_post_title(&input.title)?,
        content: sanitize_post_content(&input.content)?,
        category,
        tool: sanitize_label(input.tool.as_deref()),
        tip_category: sanitize_label(input.tip_category.as_deref()),
        tags: normalize_tags(&input.tags)?,
    };

    let post = PostRepo::create(&state.pool, current.id(), &post).await?;
    tracing::info!(post_id = %post.id, user_id = %current.id(), "Community post created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/community/posts/{id}
///
/// Counts a view on every read.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostDetail>>> {
    let mut post = PostRepo::find_published_summary(&state.pool, id)
        .await?
        .ok_or(not_found("Post", id))?;

    if let Some(views) = PostRepo::increment_views(&state.pool, id).await? {
        post.view_count = views;
    }

    let comments = build_thread(CommentRepo::list_live_for_post(&state.pool, id).await?);
    post.comment_count = count_nodes(&comments) as i64;

    Ok(Json(DataResponse {
        data: PostDetail { post, comments },
    }))
}

/// POST /api/v1/community/posts/{id}/vote
///
/// Replaces any earlier vote by the caller on the same post.
pub async fn vote(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<DbId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<Json<DataResponse<VoteSummary>>> {
    let vote_type = VoteType::parse(&input.vote_type)?;
    ensure_published(&state, post_id).await?;

    VoteRepo::upsert(&state.pool, post_id, current.id(), vote_type).await?;
    let counts = VoteRepo::counts(&state.pool, post_id).await?;
    Ok(Json(DataResponse {
        data: VoteSummary {
            counts,
            user_vote: Some(vote_type),
        },
    }))
}

/// DELETE /api/v1/community/posts/{id}/vote
pub async fn unvote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VoteSummary>>> {
    if !VoteRepo::delete(&state.pool, post_id, auth.user_id).await? {
        return Err(not_found("Vote", post_id));
    }
    let counts = VoteRepo::counts(&state.pool, post_id).await?;
    Ok(Json(DataResponse {
        data: VoteSummary {
            counts,
            user_vote: None,
        },
    }))
}

/// POST /api/v1/community/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let content = sanitize_comment(&input.content)?;
    ensure_published(&state, post_id).await?;

    if let Some(parent_id) = input.parent_comment_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id).await?;
        let replyable = parent.is_some_and(|p| p.post_id == post_id && !p.is_deleted);
        if !replyable {
            return Err(not_found("Comment", parent_id));
        }
    }

    let comment = CommentRepo::create(
        &state.pool,
        post_id,
        current.id(),
        input.parent_comment_id,
        &content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/community/comments/{id}
///
/// Soft delete, author only.
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| !c.is_deleted)
        .ok_or(not_found("Comment", id))?;

    if comment.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can delete this comment".into(),
        )));
    }

    if CommentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Comment", id))
    }
}

async fn ensure_published(state: &AppState, post_id: DbId) -> AppResult<()> {
    if PostRepo::is_published(&state.pool, post_id).await? {
        Ok(())
    } else {
        Err(not_found("Post", post_id))
    }
}
