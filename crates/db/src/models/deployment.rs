//! Deployment checklist model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `deployment_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeploymentItem {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub platform: String,
    pub priority: String,
    pub is_completed: bool,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeploymentItem {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub platform: Option<String>,
    pub priority: Option<String>,
}

/// DTO for checking off or editing a checklist step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeploymentItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub is_completed: Option<bool>,
}
