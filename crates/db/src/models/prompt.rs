use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `prompts` table: a saved prompt in the project library.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromptEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrompt {
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
