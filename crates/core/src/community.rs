//! Community forum rules: listing parameters, vote types, content
//! validation, and threaded comment assembly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sanitize::{sanitize_with_limit, MAX_INPUT_CHARS};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of posts per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of posts per page.
pub const MAX_PAGE_LIMIT: i64 = 50;

/// Posts younger than this many days are eligible for the trending sort.
pub const TRENDING_WINDOW_DAYS: i64 = 7;

/// Maximum length for a comment body.
pub const MAX_COMMENT_LEN: usize = MAX_INPUT_CHARS;

/// Maximum length for a post title.
pub const MAX_POST_TITLE_LEN: usize = 300;

/// Maximum length for a post body.
pub const MAX_POST_CONTENT_LEN: usize = 50_000;

/// Maximum number of tags on a post.
pub const MAX_TAGS: usize = 10;

/// Maximum length of a single tag.
pub const MAX_TAG_LEN: usize = 50;

/// Maximum length of the category / tool / tip category filters.
pub const MAX_FILTER_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    #[default]
    Newest,
    Oldest,
    Popular,
    Trending,
}

impl PostSort {
    pub const ALL: [PostSort; 4] = [Self::Newest, Self::Oldest, Self::Popular, Self::Trending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popular => "popular",
            Self::Trending => "trending",
        }
    }

    /// Parse a `sort` query value. `None` yields the default sort.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid sort '{raw}'. Must be one of: newest, oldest, popular, trending"
                ))
            })
    }

    /// SQL `ORDER BY` clause for the post listing query.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "p.created_at DESC, p.id DESC",
            Self::Oldest => "p.created_at ASC, p.id ASC",
            Self::Popular | Self::Trending => "score DESC, p.created_at DESC, p.id DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            other => Err(CoreError::Validation(format!(
                "Invalid vote_type '{other}'. Must be one of: upvote, downvote"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Resolved page window for a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp raw query values: page floors at 1, limit to `1..=MAX_PAGE_LIMIT`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: (total + request.limit - 1) / request.limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Content validation
// ---------------------------------------------------------------------------

/// Validate and sanitise a comment body.
pub fn sanitize_comment(content: &str) -> Result<String, CoreError> {
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LEN} characters"
        )));
    }
    let cleaned = sanitize_with_limit(content, MAX_COMMENT_LEN);
    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Validate and sanitise a post title.
pub fn sanitize_post_title(title: &str) -> Result<String, CoreError> {
    let cleaned = sanitize_with_limit(title, MAX_POST_TITLE_LEN);
    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "Post title must not be empty".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Validate and sanitise a post body.
pub fn sanitize_post_content(content: &str) -> Result<String, CoreError> {
    if content.chars().count() > MAX_POST_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Post content exceeds maximum length of {MAX_POST_CONTENT_LEN} characters"
        )));
    }
    let cleaned = sanitize_with_limit(content, MAX_POST_CONTENT_LEN);
    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "Post content must not be empty".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Sanitise a short label (category, tool, tip category). Blank → `None`.
pub fn sanitize_label(raw: Option<&str>) -> Option<String> {
    raw.map(|r| sanitize_with_limit(r, MAX_FILTER_LEN))
        .filter(|s| !s.is_empty())
}

/// Normalise one tag the way stored tags are, so filters match them.
pub fn normalize_tag(raw: &str) -> String {
    sanitize_with_limit(raw, MAX_TAG_LEN).to_lowercase()
}

/// A `?tag=` filter value, or `None` when blank.
pub fn tag_filter(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_tag).filter(|t| !t.is_empty())
}

/// Normalise tags: sanitised, lower-cased, de-duplicated, capped.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "Tag count exceeds maximum of {MAX_TAGS} (got {})",
            tags.len()
        )));
    }
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let cleaned = normalize_tag(tag);
        if !cleaned.is_empty() && !out.contains(&cleaned) {
            out.push(cleaned);
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Comment threading
// ---------------------------------------------------------------------------

/// An item that can be arranged in a reply tree.
pub trait Threaded {
    fn thread_id(&self) -> DbId;
    fn thread_parent_id(&self) -> Option<DbId>;
}

/// A comment with its direct replies, serialised flat with a `replies` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub replies: Vec<ThreadNode<T>>,
}

/// Arrange a flat, creation-ordered list into reply trees.
///
/// Two passes over the input: the first indexes every id, the second
/// attaches each item to its parent's reply list (or to the roots when it
/// has no parent, or its parent is absent from the list). Sibling order is
/// input order. Trees are then materialised bottom-up without recursion.
pub fn build_thread<T: Threaded>(items: Vec<T>) -> Vec<ThreadNode<T>> {
    let n = items.len();

    // Pass 1: id -> index.
    let index: HashMap<DbId, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.thread_id(), i))
        .collect();

    // Pass 2: attach to parent or roots.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut parent_of: Vec<Option<usize>> = vec![None; n];
    let mut roots: Vec<usize> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match item
            .thread_parent_id()
            .and_then(|pid| index.get(&pid).copied())
            .filter(|p| *p != i)
        {
            Some(p) => {
                children[p].push(i);
                parent_of[i] = Some(p);
            }
            None => roots.push(i),
        }
    }

    // Pre-order walk from the roots. Anything unreached sits on a parent
    // cycle; it is detached from its parent and promoted to a root.
    let mut visited = vec![false; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut next_root = 0;
    loop {
        while next_root < roots.len() {
            let mut stack = vec![roots[next_root]];
            next_root += 1;
            while let Some(i) = stack.pop() {
                if visited[i] {
                    continue;
                }
                visited[i] = true;
                order.push(i);
                stack.extend(children[i].iter().rev().copied());
            }
        }
        match (0..n).find(|i| !visited[*i]) {
            Some(orphan) => {
                if let Some(p) = parent_of[orphan].take() {
                    children[p].retain(|c| *c != orphan);
                }
                roots.push(orphan);
            }
            None => break,
        }
    }

    // Materialise children before parents.
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut built: Vec<Option<ThreadNode<T>>> = (0..n).map(|_| None).collect();
    for &i in order.iter().rev() {
        let replies = children[i]
            .iter()
            .filter_map(|c| built[*c].take())
            .collect();
        if let Some(item) = slots[i].take() {
            built[i] = Some(ThreadNode { item, replies });
        }
    }

    roots.iter().filter_map(|r| built[*r].take()).collect()
}

/// Total number of nodes in a forest, replies included.
pub fn count_nodes<T>(nodes: &[ThreadNode<T>]) -> usize {
    let mut total = 0;
    let mut stack: Vec<&ThreadNode<T>> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        total += 1;
        stack.extend(node.replies.iter());
    }
    total
}
