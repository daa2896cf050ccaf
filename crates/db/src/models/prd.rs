use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `prds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prd {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: String,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrd {
    pub title: String,
    pub content: Option<String>,
}
