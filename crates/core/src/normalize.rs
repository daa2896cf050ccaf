//! Parsing and repair of structured LLM output.
//!
//! The model is asked for a JSON array but may wrap it in markdown fences,
//! surround it with prose, nest it under a key, or return garbage. This
//! module extracts whatever array of objects it can find, rebuilds each item
//! through the action's [`ItemSchema`], and substitutes the hardcoded
//! fallback list when nothing usable survives.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::fallback;
use crate::schema::{
    deployment_schema, design_task_schema, roadmap_schema, task_schema, ItemSchema,
};

/// Compiled regex capturing the body of the first fenced code block.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*\n?(.*?)\s*```").expect("valid regex")
});

/// Maximum number of generated items kept from one response.
pub const MAX_GENERATED_ITEMS: usize = 50;

/// The structured output families the proxy normalises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredKind {
    Roadmap,
    Tasks,
    DesignTasks,
    Deployment { platform: &'static str },
}

impl StructuredKind {
    pub fn schema(&self) -> ItemSchema {
        match self {
            Self::Roadmap => roadmap_schema(),
            Self::Tasks => task_schema(),
            Self::DesignTasks => design_task_schema(),
            Self::Deployment { platform } => deployment_schema(platform),
        }
    }

    /// Object keys under which the model may nest the item array.
    pub fn container_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Roadmap => &["roadmap", "items", "milestones"],
            Self::Tasks | Self::DesignTasks => &["tasks", "items"],
            Self::Deployment { .. } => &["checklist", "items", "tasks"],
        }
    }

    pub fn fallback_items(&self) -> Vec<Map<String, Value>> {
        match self {
            Self::Roadmap => fallback::roadmap_items(),
            Self::Tasks => fallback::tasks(),
            Self::DesignTasks => fallback::design_tasks(),
            Self::Deployment { .. } => fallback::deployment_items(),
        }
    }
}

/// Result of normalising one model response.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Schema-valid items with `position` equal to their index.
    pub items: Vec<Value>,
    /// `true` when the fallback list replaced the model output.
    pub used_fallback: bool,
}

/// Remove a surrounding markdown code fence, if any, and trim.
pub fn strip_code_fences(raw: &str) -> &str {
    match FENCE_RE.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => raw.trim(),
    }
}

/// Parse `raw` as JSON, retrying on the outermost `[...]` or `{...}`
/// substring when the model surrounded the payload with prose.
fn parse_lenient(raw: &str) -> Option<Value> {
    let body = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(value);
    }
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&body[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Extract the object items from a parsed response.
///
/// Accepts a top-level array or an object nesting the array under one of
/// `container_keys`. Non-object entries are dropped. Returns `None` when no
/// object items remain.
pub fn extract_items(raw: &str, container_keys: &[&str]) -> Option<Vec<Map<String, Value>>> {
    let array = match parse_lenient(raw)? {
        Value::Array(items) => items,
        Value::Object(mut map) => container_keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })?,
        _ => return None,
    };

    let objects: Vec<Map<String, Value>> = array
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .take(MAX_GENERATED_ITEMS)
        .collect();

    if objects.is_empty() {
        None
    } else {
        Some(objects)
    }
}

/// Normalise a raw model response for `kind`, never failing.
pub fn normalize_output(raw: &str, kind: StructuredKind) -> Normalized {
    let schema = kind.schema();
    match extract_items(raw, kind.container_keys()) {
        Some(items) => Normalized {
            items: schema.normalize_all(&items),
            used_fallback: false,
        },
        None => Normalized {
            items: schema.normalize_all(&kind.fallback_items()),
            used_fallback: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::POSITION_FIELD;
    use crate::workspace::{DEPLOYMENT_CATEGORIES, TASK_PRIORITIES, TASK_STATUSES};

    const ALL_KINDS: [StructuredKind; 4] = [
        StructuredKind::Roadmap,
        StructuredKind::Tasks,
        StructuredKind::DesignTasks,
        StructuredKind::Deployment {
            platform: "universal",
        },
    ];

    fn assert_positions(items: &[Value]) {
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item[POSITION_FIELD], json!(i), "position must equal index");
        }
    }

    #[test]
    fn strips_json_fence() {
        let raw = "Here you go:\n```json\n[{\"title\": \"a\"}]\n```\nThanks";
        assert_eq!(strip_code_fences(raw), "[{\"title\": \"a\"}]");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2] "), "[1, 2]");
    }

    #[test]
    fn parses_fenced_array() {
        let raw = "```json\n[{\"title\":\"Login\",\"status\":\"done\",\"priority\":\"high\"}]\n```";
        let out = normalize_output(raw, StructuredKind::Tasks);
        assert!(!out.used_fallback);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0]["title"], "Login");
        assert_eq!(out.items[0]["status"], "done");
    }

    #[test]
    fn finds_array_inside_prose() {
        let raw = "Sure! [{\"title\": \"One\"}, {\"title\": \"Two\"}] Let me know.";
        let out = normalize_output(raw, StructuredKind::Roadmap);
        assert!(!out.used_fallback);
        assert_eq!(out.items.len(), 2);
        assert_positions(&out.items);
    }

    #[test]
    fn accepts_nested_container_key() {
        let raw = r#"{"checklist": [{"title": "DNS", "category": "hosting"}]}"#;
        let out = normalize_output(raw, StructuredKind::Deployment { platform: "fly" });
        assert!(!out.used_fallback);
        assert_eq!(out.items[0]["category"], "hosting");
        assert_eq!(out.items[0]["platform"], "fly");
    }

    #[test]
    fn malformed_output_yields_schema_valid_fallback() {
        for kind in ALL_KINDS {
            for raw in ["", "not json at all", "{\"title\": 1", "```json\n{oops}\n```"] {
                let out = normalize_output(raw, kind);
                assert!(out.used_fallback, "{kind:?} with {raw:?}");
                assert!(!out.items.is_empty());
                assert_positions(&out.items);
                let schema = kind.schema();
                for item in &out.items {
                    for field in schema.fields() {
                        assert!(item.get(field.name).is_some(), "missing {}", field.name);
                    }
                }
            }
        }
    }

    #[test]
    fn non_array_output_yields_fallback() {
        for raw in ["42", "\"a string\"", "{\"summary\": \"no list here\"}", "null", "[]"] {
            let out = normalize_output(raw, StructuredKind::Tasks);
            assert!(out.used_fallback, "{raw:?} must fall back");
            assert_eq!(out.items.len(), fallback::tasks().len());
        }
    }

    #[test]
    fn array_without_objects_yields_fallback() {
        let out = normalize_output("[1, \"two\", null]", StructuredKind::Roadmap);
        assert!(out.used_fallback);
    }

    #[test]
    fn deployment_fallback_has_six_steps() {
        let out = normalize_output("nope", StructuredKind::Deployment { platform: "universal" });
        assert_eq!(out.items.len(), 6);
        for item in &out.items {
            assert!(DEPLOYMENT_CATEGORIES.contains(&item["category"].as_str().unwrap()));
            assert_eq!(item["platform"], "universal");
            assert_eq!(item["is_completed"], false);
        }
    }

    #[test]
    fn invalid_values_are_replaced_and_positions_reassigned() {
        let raw = r#"[
            {"title": "A", "status": "blocked", "priority": "p0", "position": 9},
            {"title": "B", "status": "todo", "priority": "low", "position": 3}
        ]"#;
        let out = normalize_output(raw, StructuredKind::Tasks);
        assert_eq!(out.items[0]["status"], "todo");
        assert_eq!(out.items[0]["priority"], "medium");
        assert_eq!(out.items[1]["priority"], "low");
        assert_positions(&out.items);
        for item in &out.items {
            assert!(TASK_STATUSES.contains(&item["status"].as_str().unwrap()));
            assert!(TASK_PRIORITIES.contains(&item["priority"].as_str().unwrap()));
        }
    }

    #[test]
    fn caps_item_count() {
        let many: Vec<Value> = (0..80).map(|i| json!({ "title": format!("t{i}") })).collect();
        let raw = serde_json::to_string(&many).unwrap();
        let out = normalize_output(&raw, StructuredKind::Tasks);
        assert_eq!(out.items.len(), MAX_GENERATED_ITEMS);
        assert_positions(&out.items);
    }
}
