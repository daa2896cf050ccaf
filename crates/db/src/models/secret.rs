use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `secrets` table. Values are stored as entered.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Secret {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub value: String,
    pub environment: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSecret {
    pub name: String,
    pub value: String,
    pub environment: Option<String>,
    pub description: Option<String>,
}
