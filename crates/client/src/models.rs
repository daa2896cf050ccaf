//! Response and request bodies as seen from the client side.

use serde::{Deserialize, Serialize};
use vlab_core::types::{DbId, Timestamp};
use vlab_core::workspace::WorkspaceLayout;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_anonymous: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub workspace_layout: WorkspaceLayout,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Workspace modules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prd {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: String,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoadmapItem {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub phase: String,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub estimated_hours: Option<f64>,
    pub category: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Note {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: String,
    pub color: Option<String>,
    pub is_pinned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

/// `GET /projects/{id}/workspace`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkspaceSnapshot {
    pub project: Project,
    pub prds: Vec<Prd>,
    pub roadmap: Vec<RoadmapItem>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub prompts: Vec<PromptEntry>,
    pub secrets: Vec<Secret>,
    pub deployment: Vec<DeploymentItem>,
}
