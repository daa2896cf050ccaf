//! Declarative item schemas for structured LLM output.
//!
//! Every generated item is rebuilt field by field from its schema. Values
//! the model returned are only copied through when they pass the field's
//! rule; anything else becomes the field default. Keys not named by the
//! schema are dropped.

use serde_json::{Map, Number, Value};

use crate::project::MAX_TITLE_LEN;
use crate::sanitize::sanitize_with_limit;
use crate::workspace::{
    DEPLOYMENT_CATEGORIES, DEPLOYMENT_PLATFORMS, DESIGN_CATEGORIES, ROADMAP_PHASES,
    ROADMAP_PRIORITIES, ROADMAP_STATUSES, TASK_PRIORITIES, TASK_STATUSES,
};

/// Maximum length of a generated item description.
pub const MAX_ITEM_DESCRIPTION_LEN: usize = 2_000;

/// Upper bound accepted for `estimated_hours`.
pub const MAX_ESTIMATED_HOURS: f64 = 1_000.0;

/// Key under which the output index is written.
pub const POSITION_FIELD: &str = "position";

/// Validation rule for a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text, sanitised and clipped. Blank values become `default`.
    Text { default: &'static str, max_len: usize },
    /// One of `allowed`, compared case-insensitively with spaces and
    /// hyphens folded to underscores.
    Enum {
        allowed: &'static [&'static str],
        default: &'static str,
    },
    /// Optional number within `min..=max`; anything else becomes `null`.
    Number { min: f64, max: f64 },
    /// Always this boolean, whatever the model said.
    Fixed(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str, default: &'static str, max_len: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Text { default, max_len },
        }
    }

    pub const fn one_of(
        name: &'static str,
        allowed: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Enum { allowed, default },
        }
    }

    pub const fn number(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            kind: FieldKind::Number { min, max },
        }
    }

    pub const fn fixed(name: &'static str, value: bool) -> Self {
        Self {
            name,
            kind: FieldKind::Fixed(value),
        }
    }

    /// Coerce a raw model value (or its absence) into a valid field value.
    pub fn coerce(&self, raw: Option<&Value>) -> Value {
        match self.kind {
            FieldKind::Text { default, max_len } => {
                let text = match raw {
                    Some(Value::String(s)) => sanitize_with_limit(s, max_len),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => String::new(),
                };
                if text.is_empty() {
                    Value::String(default.to_string())
                } else {
                    Value::String(text)
                }
            }
            FieldKind::Enum { allowed, default } => {
                let chosen = raw
                    .and_then(Value::as_str)
                    .map(fold_enum_value)
                    .and_then(|v| allowed.iter().copied().find(|a| *a == v))
                    .unwrap_or(default);
                Value::String(chosen.to_string())
            }
            FieldKind::Number { min, max } => {
                let number = match raw {
                    Some(Value::Number(n)) => n.as_f64(),
                    Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                number
                    .filter(|n| n.is_finite() && (min..=max).contains(n))
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
            FieldKind::Fixed(value) => Value::Bool(value),
        }
    }

    /// One-line description used when instructing the model.
    fn describe(&self) -> String {
        match self.kind {
            FieldKind::Text { .. } => format!("\"{}\" (string)", self.name),
            FieldKind::Enum { allowed, .. } => {
                format!("\"{}\" (one of: {})", self.name, allowed.join(", "))
            }
            FieldKind::Number { min, max } => {
                format!("\"{}\" (number between {min} and {max})", self.name)
            }
            FieldKind::Fixed(value) => format!("\"{}\" (always {value})", self.name),
        }
    }
}

fn fold_enum_value(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// An ordered list of field rules describing one generated item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSchema {
    fields: Vec<FieldSpec>,
}

impl ItemSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Rebuild one item from the schema. Unknown keys are dropped.
    pub fn normalize_item(&self, item: &Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.name.to_string(), field.coerce(item.get(field.name))))
            .collect()
    }

    /// Rebuild every item and stamp `position` with its output index.
    pub fn normalize_all(&self, items: &[Map<String, Value>]) -> Vec<Value> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let mut normalized = self.normalize_item(item);
                normalized.insert(POSITION_FIELD.to_string(), Value::from(index));
                Value::Object(normalized)
            })
            .collect()
    }

    /// Human-readable field list for prompt instructions.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(FieldSpec::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Concrete schemas
// ---------------------------------------------------------------------------

pub fn roadmap_schema() -> ItemSchema {
    ItemSchema::new(vec![
        FieldSpec::text("title", "Untitled milestone", MAX_TITLE_LEN),
        FieldSpec::text("description", "", MAX_ITEM_DESCRIPTION_LEN),
        FieldSpec::one_of("status", ROADMAP_STATUSES, "planned"),
        FieldSpec::one_of("priority", ROADMAP_PRIORITIES, "medium"),
        FieldSpec::one_of("phase", ROADMAP_PHASES, "development"),
    ])
}

pub fn task_schema() -> ItemSchema {
    ItemSchema::new(task_fields())
}

pub fn design_task_schema() -> ItemSchema {
    let mut fields = task_fields();
    fields.push(FieldSpec::one_of("category", DESIGN_CATEGORIES, "ui"));
    ItemSchema::new(fields)
}

/// Deployment checklist schema. `platform` must come from
/// [`DEPLOYMENT_PLATFORMS`] and becomes the default for every item.
pub fn deployment_schema(platform: &'static str) -> ItemSchema {
    ItemSchema::new(vec![
        FieldSpec::text("title", "Untitled step", MAX_TITLE_LEN),
        FieldSpec::text("description", "", MAX_ITEM_DESCRIPTION_LEN),
        FieldSpec::one_of("category", DEPLOYMENT_CATEGORIES, "pre_deployment"),
        FieldSpec::one_of("platform", DEPLOYMENT_PLATFORMS, platform),
        FieldSpec::one_of("priority", ROADMAP_PRIORITIES, "medium"),
        FieldSpec::fixed("is_completed", false),
    ])
}

fn task_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("title", "Untitled task", MAX_TITLE_LEN),
        FieldSpec::text("description", "", MAX_ITEM_DESCRIPTION_LEN),
        FieldSpec::one_of("status", TASK_STATUSES, "todo"),
        FieldSpec::one_of("priority", TASK_PRIORITIES, "medium"),
        FieldSpec::number("estimated_hours", 0.0, MAX_ESTIMATED_HOURS),
    ]
}
