//! Project and module-record field validation.

use crate::error::CoreError;
use crate::schema::MAX_ESTIMATED_HOURS;

/// Maximum length for a project name.
pub const MAX_PROJECT_NAME_LEN: usize = 200;

/// Maximum length for a project description.
pub const MAX_DESCRIPTION_LEN: usize = 5_000;

/// Maximum length for a module record title (PRD, roadmap item, task...).
pub const MAX_TITLE_LEN: usize = 300;

/// Maximum length for module record bodies (PRD content, notes, prompts).
pub const MAX_CONTENT_LEN: usize = 100_000;

/// Maximum length for a secret's name.
pub const MAX_SECRET_NAME_LEN: usize = 200;

/// Validate a project name: non-empty after trimming and within length limit.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    validate_required("Project name", name, MAX_PROJECT_NAME_LEN)
}

/// Validate an optional description: length check only.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    validate_max_len("Description", description, MAX_DESCRIPTION_LEN)
}

/// Validate a module record title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_required("Title", title, MAX_TITLE_LEN)
}

/// Validate a module record body.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    validate_max_len("Content", content, MAX_CONTENT_LEN)
}

/// Validate a secret's name.
pub fn validate_secret_name(name: &str) -> Result<(), CoreError> {
    validate_required("Secret name", name, MAX_SECRET_NAME_LEN)
}

/// Validate a task estimate: finite and within `0..=MAX_ESTIMATED_HOURS`.
pub fn validate_estimated_hours(hours: f64) -> Result<(), CoreError> {
    if hours.is_finite() && (0.0..=MAX_ESTIMATED_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "estimated_hours must be between 0 and {MAX_ESTIMATED_HOURS}"
        )))
    }
}

fn validate_required(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    validate_max_len(field, value, max)
}

fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}
