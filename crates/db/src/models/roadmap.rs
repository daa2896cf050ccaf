//! Roadmap milestone model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vlab_core::types::{DbId, Timestamp};

/// A row from the `roadmap_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
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

/// DTO for creating a roadmap item. Omitted enum fields take the column default.
///
/// Also used for bulk inserts of generated items, so unknown keys such as
/// `position` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoadmapItem {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub phase: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoadmapItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub phase: Option<String>,
}
