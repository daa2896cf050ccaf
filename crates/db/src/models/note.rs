use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `scratchpad_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScratchpadNote {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: String,
    pub color: Option<String>,
    pub is_pinned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub is_pinned: Option<bool>,
}
