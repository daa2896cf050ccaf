//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameter for project listings that may include archived rows.
#[derive(Debug, Deserialize)]
pub struct IncludeArchivedParams {
    #[serde(default)]
    pub include_archived: bool,
}

/// Query parameters for the community post listing.
///
/// Raw values; the handler clamps, sanitises and validates them.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub tool: Option<String>,
    pub tip_category: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub tag: Option<String>,
}
