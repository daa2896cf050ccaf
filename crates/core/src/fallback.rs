//! Hardcoded items returned when the model's structured output is unusable.
//!
//! The lists are raw JSON objects; callers run them through the same schema
//! as model output so the fallback is schema-valid by construction.

use serde_json::{json, Map, Value};

fn objects(values: Vec<Value>) -> Vec<Map<String, Value>> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

pub fn roadmap_items() -> Vec<Map<String, Value>> {
    objects(vec![
        json!({
            "title": "Discovery and planning",
            "description": "Confirm requirements, success metrics and the scope of the first release.",
            "status": "planned", "priority": "high", "phase": "planning"
        }),
        json!({
            "title": "Core feature development",
            "description": "Build the features required for the minimum viable product.",
            "status": "planned", "priority": "high", "phase": "development"
        }),
        json!({
            "title": "Testing and quality assurance",
            "description": "Write automated tests, fix defects and run a usability review.",
            "status": "planned", "priority": "medium", "phase": "testing"
        }),
        json!({
            "title": "Launch",
            "description": "Deploy to production and announce the release.",
            "status": "planned", "priority": "high", "phase": "launch"
        }),
        json!({
            "title": "Post-launch iteration",
            "description": "Collect feedback, monitor usage and plan the next improvements.",
            "status": "planned", "priority": "medium", "phase": "post_launch"
        }),
    ])
}

pub fn tasks() -> Vec<Map<String, Value>> {
    objects(vec![
        json!({
            "title": "Set up the project repository",
            "description": "Initialise version control, formatting and CI.",
            "priority": "high", "estimated_hours": 2
        }),
        json!({
            "title": "Design the data model",
            "description": "Define entities, relationships and access rules.",
            "priority": "high", "estimated_hours": 4
        }),
        json!({
            "title": "Implement authentication",
            "description": "Add sign-up, sign-in and session handling.",
            "priority": "high", "estimated_hours": 6
        }),
        json!({
            "title": "Build the core user flow",
            "description": "Implement the main feature end to end.",
            "priority": "urgent", "estimated_hours": 12
        }),
        json!({
            "title": "Write tests",
            "description": "Cover the core flow with automated tests.",
            "priority": "medium", "estimated_hours": 6
        }),
        json!({
            "title": "Prepare deployment",
            "description": "Configure hosting, environment variables and monitoring.",
            "priority": "medium", "estimated_hours": 3
        }),
    ])
}

pub fn design_tasks() -> Vec<Map<String, Value>> {
    objects(vec![
        json!({
            "title": "Define the visual style",
            "description": "Choose colour palette, typography and spacing scale.",
            "priority": "high", "category": "branding", "estimated_hours": 4
        }),
        json!({
            "title": "Create page layouts",
            "description": "Wireframe the main screens and navigation structure.",
            "priority": "high", "category": "layout", "estimated_hours": 6
        }),
        json!({
            "title": "Build reusable UI components",
            "description": "Buttons, inputs, cards and modals matching the style guide.",
            "priority": "medium", "category": "ui", "estimated_hours": 8
        }),
        json!({
            "title": "Make layouts responsive",
            "description": "Verify every screen on mobile, tablet and desktop widths.",
            "priority": "medium", "category": "responsive", "estimated_hours": 5
        }),
        json!({
            "title": "Accessibility review",
            "description": "Check contrast, keyboard navigation and screen reader labels.",
            "priority": "medium", "category": "accessibility", "estimated_hours": 3
        }),
    ])
}

pub fn deployment_items() -> Vec<Map<String, Value>> {
    objects(vec![
        json!({
            "title": "Configure environment variables",
            "description": "Set production values for every required variable and keep secrets out of the repository.",
            "category": "environment", "priority": "high"
        }),
        json!({
            "title": "Run the production build",
            "description": "Build the application with production settings and fix any warnings.",
            "category": "build", "priority": "high"
        }),
        json!({
            "title": "Apply database migrations",
            "description": "Run pending migrations against the production database and verify backups.",
            "category": "database", "priority": "high"
        }),
        json!({
            "title": "Review security settings",
            "description": "Enable HTTPS, restrict CORS origins and review access policies.",
            "category": "security", "priority": "critical"
        }),
        json!({
            "title": "Deploy to hosting",
            "description": "Publish the build to the hosting platform and configure the domain.",
            "category": "hosting", "priority": "high"
        }),
        json!({
            "title": "Set up monitoring",
            "description": "Enable error tracking, uptime checks and log retention.",
            "category": "monitoring", "priority": "medium"
        }),
    ])
}
