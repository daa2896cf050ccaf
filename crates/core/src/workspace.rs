//! Workspace module types, layout validation and the value enumerations
//! shared by module records and generated items.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Module types
// ---------------------------------------------------------------------------

/// The fixed set of module types a project workspace can contain.
pub const MODULE_TYPES: &[&str] = &[
    "prd",
    "roadmap",
    "tasks",
    "scratchpad",
    "prompts",
    "secrets",
    "deployment",
    "design",
];

/// Returns `true` if the given module type string is valid.
pub fn is_valid_module_type(module_type: &str) -> bool {
    MODULE_TYPES.contains(&module_type)
}

// ---------------------------------------------------------------------------
// Record enumerations
// ---------------------------------------------------------------------------

pub const ROADMAP_STATUSES: &[&str] = &["planned", "in_progress", "completed"];
pub const ROADMAP_PHASES: &[&str] = &[
    "planning",
    "development",
    "testing",
    "launch",
    "post_launch",
];
pub const ROADMAP_PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

pub const TASK_STATUSES: &[&str] = &["todo", "in_progress", "done"];
pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

pub const DESIGN_CATEGORIES: &[&str] = &[
    "ui",
    "ux",
    "branding",
    "layout",
    "accessibility",
    "responsive",
    "assets",
];

pub const DEPLOYMENT_CATEGORIES: &[&str] = &[
    "pre_deployment",
    "environment",
    "security",
    "database",
    "build",
    "hosting",
    "monitoring",
    "post_deployment",
];

/// Deployment target platforms. Mirrors `ck_deployment_items_platform`.
pub const DEPLOYMENT_PLATFORMS: &[&str] = &[
    "vercel",
    "netlify",
    "railway",
    "render",
    "fly",
    "aws",
    "gcp",
    "azure",
    "heroku",
    "universal",
];

/// Platform used when a checklist is requested without one.
pub const DEFAULT_PLATFORM: &str = "universal";

pub const SECRET_ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

/// Validate that `value` is one of `allowed`, naming `field` in the error.
pub fn validate_enum(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Resolve a requested platform to its canonical `'static` entry.
///
/// Matching is case-insensitive. Returns `None` for unknown platforms.
pub fn resolve_platform(requested: &str) -> Option<&'static str> {
    let lowered = requested.trim().to_ascii_lowercase();
    DEPLOYMENT_PLATFORMS.iter().copied().find(|p| *p == lowered)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Maximum grid coordinate or size accepted for a module placement.
pub const MAX_GRID_UNITS: i32 = 1_000;

/// Placement of one module card on the workspace grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePlacement {
    pub module_type: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The per-project `workspace_layout` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    pub modules: Vec<ModulePlacement>,
}

/// Layout given to new projects: every module, two cards per row.
pub fn default_layout() -> WorkspaceLayout {
    let modules = MODULE_TYPES
        .iter()
        .enumerate()
        .map(|(i, module_type)| ModulePlacement {
            module_type: (*module_type).to_string(),
            x: (i as i32 % 2) * 6,
            y: (i as i32 / 2) * 4,
            w: 6,
            h: 4,
        })
        .collect();
    WorkspaceLayout { modules }
}

/// Validate a layout: known module types, no duplicates, sane geometry.
pub fn validate_layout(layout: &WorkspaceLayout) -> Result<(), CoreError> {
    let mut seen: Vec<&str> = Vec::with_capacity(layout.modules.len());

    for placement in &layout.modules {
        let module_type = placement.module_type.as_str();
        validate_enum("module_type", module_type, MODULE_TYPES)?;

        if seen.contains(&module_type) {
            return Err(CoreError::Validation(format!(
                "Duplicate module '{module_type}' in layout"
            )));
        }
        seen.push(module_type);

        if placement.x < 0 || placement.y < 0 {
            return Err(CoreError::Validation(format!(
                "Module '{module_type}' has a negative position"
            )));
        }
        if placement.w < 1 || placement.h < 1 {
            return Err(CoreError::Validation(format!(
                "Module '{module_type}' must have a positive size"
            )));
        }
        if [placement.x, placement.y, placement.w, placement.h]
            .iter()
            .any(|v| *v > MAX_GRID_UNITS)
        {
            return Err(CoreError::Validation(format!(
                "Module '{module_type}' exceeds the grid bounds of {MAX_GRID_UNITS}"
            )));
        }
    }
    Ok(())
}
