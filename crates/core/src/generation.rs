//! Generation actions accepted by the LLM proxy: allow-list, per-action
//! input validation, and prompt construction.
//!
//! Request bodies arrive as loose JSON objects. [`GenerationInput::from_body`]
//! checks the `action` against the allow-list first, then pulls and
//! sanitises the fields that action requires. Nothing here talks to the
//! model; the resulting [`Prompt`] is handed to an LLM client.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::normalize::StructuredKind;
use crate::project::MAX_TITLE_LEN;
use crate::sanitize::{sanitize_text, sanitize_with_limit};
use crate::workspace::{resolve_platform, DEFAULT_PLATFORM, DEPLOYMENT_PLATFORMS};

/// Maximum number of prior chat turns forwarded with a chat message.
pub const MAX_HISTORY_MESSAGES: usize = 20;

/// Maximum number of conversation messages accepted for summary / PRD.
pub const MAX_CONVERSATION_MESSAGES: usize = 200;

/// Maximum number of roadmap items forwarded when generating tasks.
pub const MAX_ROADMAP_ITEMS: usize = 50;

/// Image media types accepted by `design_tasks_image`.
pub const IMAGE_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/gif"];

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationAction {
    Chat,
    Summary,
    Prd,
    Roadmap,
    Tasks,
    DesignTasks,
    DesignTasksImage,
    DeploymentChecklist,
}

impl GenerationAction {
    pub const ALL: [GenerationAction; 8] = [
        Self::Chat,
        Self::Summary,
        Self::Prd,
        Self::Roadmap,
        Self::Tasks,
        Self::DesignTasks,
        Self::DesignTasksImage,
        Self::DeploymentChecklist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Summary => "summary",
            Self::Prd => "prd",
            Self::Roadmap => "roadmap",
            Self::Tasks => "tasks",
            Self::DesignTasks => "design_tasks",
            Self::DesignTasksImage => "design_tasks_image",
            Self::DeploymentChecklist => "deployment_checklist",
        }
    }

    /// Allow-list lookup. Returns `None` for anything not in [`Self::ALL`].
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == raw)
    }

    /// `true` for actions whose reply is a normalised item array.
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Chat | Self::Summary | Self::Prd)
    }
}

impl fmt::Display for GenerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A base64 image decoded from a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub media_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Image { media_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: ChatRole,
    pub parts: Vec<PromptPart>,
}

impl PromptTurn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![PromptPart::Text(text.into())],
        }
    }
}

/// A complete model request: system instructions plus conversation turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub turns: Vec<PromptTurn>,
}

// ---------------------------------------------------------------------------
// Validated input
// ---------------------------------------------------------------------------

/// A request body that passed the allow-list and field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationInput {
    Chat {
        message: String,
        history: Vec<ChatMessage>,
        project_context: Option<String>,
    },
    Summary {
        messages: Vec<ChatMessage>,
    },
    Prd {
        messages: Vec<ChatMessage>,
        project_name: Option<String>,
    },
    Roadmap {
        prd_content: String,
    },
    Tasks {
        prd_content: String,
        roadmap_items: Vec<String>,
    },
    DesignTasks {
        design_description: String,
    },
    DesignTasksImage {
        image: ImageInput,
        design_description: Option<String>,
    },
    DeploymentChecklist {
        prd_content: String,
        platform: &'static str,
    },
}

impl GenerationInput {
    /// Validate a raw request body.
    ///
    /// The action is checked against the allow-list before any field is
    /// read, so unknown actions are rejected regardless of the other keys.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, CoreError> {
        let raw_action = body
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("action"))?;

        let action = GenerationAction::parse(raw_action).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid action. Must be one of: {}",
                GenerationAction::ALL.map(|a| a.as_str()).join(", ")
            ))
        })?;

        let input = match action {
            GenerationAction::Chat => Self::Chat {
                message: required_text(body, "message")?,
                history: chat_messages(body, "history", MAX_HISTORY_MESSAGES)?,
                project_context: optional_text(body, "projectContext")?,
            },
            GenerationAction::Summary => Self::Summary {
                messages: required_conversation(body, "messages")?,
            },
            GenerationAction::Prd => Self::Prd {
                messages: required_conversation(body, "messages")?,
                project_name: optional_text(body, "projectName")?,
            },
            GenerationAction::Roadmap => Self::Roadmap {
                prd_content: required_text(body, "prdContent")?,
            },
            GenerationAction::Tasks => Self::Tasks {
                prd_content: required_text(body, "prdContent")?,
                roadmap_items: roadmap_titles(body)?,
            },
            GenerationAction::DesignTasks => Self::DesignTasks {
                design_description: required_text(body, "designDescription")?,
            },
            GenerationAction::DesignTasksImage => Self::DesignTasksImage {
                image: image_input(body)?,
                design_description: optional_text(body, "designDescription")?,
            },
            GenerationAction::DeploymentChecklist => Self::DeploymentChecklist {
                prd_content: required_text(body, "prdContent")?,
                platform: platform(body)?,
            },
        };
        Ok(input)
    }

    pub fn action(&self) -> GenerationAction {
        match self {
            Self::Chat { .. } => GenerationAction::Chat,
            Self::Summary { .. } => GenerationAction::Summary,
            Self::Prd { .. } => GenerationAction::Prd,
            Self::Roadmap { .. } => GenerationAction::Roadmap,
            Self::Tasks { .. } => GenerationAction::Tasks,
            Self::DesignTasks { .. } => GenerationAction::DesignTasks,
            Self::DesignTasksImage { .. } => GenerationAction::DesignTasksImage,
            Self::DeploymentChecklist { .. } => GenerationAction::DeploymentChecklist,
        }
    }

    /// Output family for structured actions; `None` for plain-text replies.
    pub fn structured_kind(&self) -> Option<StructuredKind> {
        match self {
            Self::Chat { .. } | Self::Summary { .. } | Self::Prd { .. } => None,
            Self::Roadmap { .. } => Some(StructuredKind::Roadmap),
            Self::Tasks { .. } => Some(StructuredKind::Tasks),
            Self::DesignTasks { .. } | Self::DesignTasksImage { .. } => {
                Some(StructuredKind::DesignTasks)
            }
            Self::DeploymentChecklist { platform, .. } => {
                Some(StructuredKind::Deployment { platform })
            }
        }
    }

    /// Build the model request for this input.
    pub fn build_prompt(&self) -> Prompt {
        match self {
            Self::Chat {
                message,
                history,
                project_context,
            } => {
                let mut system = String::from(CHAT_SYSTEM);
                if let Some(context) = project_context {
                    system.push_str("\n\nProject context:\n");
                    system.push_str(context);
                }
                let mut turns: Vec<PromptTurn> = history
                    .iter()
                    .skip_while(|m| m.role != ChatRole::User)
                    .map(|m| PromptTurn {
                        role: m.role,
                        parts: vec![PromptPart::Text(m.content.clone())],
                    })
                    .collect();
                turns.push(PromptTurn::user_text(message.clone()));
                Prompt { system, turns }
            }
            Self::Summary { messages } => Prompt {
                system: SUMMARY_SYSTEM.to_string(),
                turns: vec![PromptTurn::user_text(format!(
                    "Summarise this conversation:\n\n{}",
                    transcript(messages)
                ))],
            },
            Self::Prd {
                messages,
                project_name,
            } => {
                let heading = match project_name {
                    Some(name) => format!("Write a PRD for the project \"{name}\"."),
                    None => "Write a PRD for the project discussed below.".to_string(),
                };
                Prompt {
                    system: PRD_SYSTEM.to_string(),
                    turns: vec![PromptTurn::user_text(format!(
                        "{heading}\n\nConversation:\n{}",
                        transcript(messages)
                    ))],
                }
            }
            Self::Roadmap { prd_content } => structured_prompt(
                StructuredKind::Roadmap,
                "a product roadmap of 4 to 8 milestones",
                format!("PRD:\n{prd_content}"),
            ),
            Self::Tasks {
                prd_content,
                roadmap_items,
            } => {
                let mut context = format!("PRD:\n{prd_content}");
                if !roadmap_items.is_empty() {
                    context.push_str("\n\nRoadmap milestones:\n");
                    for item in roadmap_items {
                        context.push_str("- ");
                        context.push_str(item);
                        context.push('\n');
                    }
                }
                structured_prompt(
                    StructuredKind::Tasks,
                    "an ordered list of 5 to 15 concrete development tasks",
                    context,
                )
            }
            Self::DesignTasks { design_description } => structured_prompt(
                StructuredKind::DesignTasks,
                "an ordered list of 4 to 12 design tasks",
                format!("Design brief:\n{design_description}"),
            ),
            Self::DesignTasksImage {
                image,
                design_description,
            } => {
                let kind = StructuredKind::DesignTasks;
                let mut text = format!(
                    "Analyse the attached design image and produce an ordered list of 4 to 12 design tasks needed to implement it.\n{}",
                    json_instructions(kind)
                );
                if let Some(description) = design_description {
                    text.push_str("\n\nAdditional notes:\n");
                    text.push_str(description);
                }
                Prompt {
                    system: STRUCTURED_SYSTEM.to_string(),
                    turns: vec![PromptTurn {
                        role: ChatRole::User,
                        parts: vec![
                            PromptPart::Image {
                                media_type: image.media_type.clone(),
                                data: image.data.clone(),
                            },
                            PromptPart::Text(text),
                        ],
                    }],
                }
            }
            Self::DeploymentChecklist {
                prd_content,
                platform,
            } => structured_prompt(
                StructuredKind::Deployment { platform },
                &format!("a deployment checklist of 6 to 15 steps targeting the '{platform}' platform"),
                format!("PRD:\n{prd_content}"),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt text
// ---------------------------------------------------------------------------

const CHAT_SYSTEM: &str = "You are VLab's product assistant. Help the user shape their project idea: \
ask clarifying questions, suggest features, and keep answers concise and practical.";

const SUMMARY_SYSTEM: &str = "You summarise product discussions. Produce a concise summary of the \
goals, target users, key features and open questions. Use plain text with short bullet lists.";

const PRD_SYSTEM: &str = "You are a senior product manager. Write a clear product requirements \
document in Markdown with sections: Overview, Goals, Target Users, Features, Non-Goals, \
Technical Considerations, Success Metrics.";

const STRUCTURED_SYSTEM: &str = "You convert product documents into structured project plans. \
You reply with JSON only, no commentary.";

fn json_instructions(kind: StructuredKind) -> String {
    format!(
        "Respond ONLY with a JSON array. Each element is an object with the fields: {}.",
        kind.schema().describe()
    )
}

fn structured_prompt(kind: StructuredKind, goal: &str, context: String) -> Prompt {
    Prompt {
        system: STRUCTURED_SYSTEM.to_string(),
        turns: vec![PromptTurn::user_text(format!(
            "Create {goal}.\n{}\n\n{context}",
            json_instructions(kind)
        ))],
    }
}

fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

fn missing(field: &str) -> CoreError {
    CoreError::Validation(format!("Missing required field '{field}'"))
}

fn wrong_type(field: &str, expected: &str) -> CoreError {
    CoreError::Validation(format!("Field '{field}' must be {expected}"))
}

/// A required string field, sanitised. Blank after sanitising counts as missing.
fn required_text(body: &Map<String, Value>, field: &str) -> Result<String, CoreError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(missing(field)),
        Some(Value::String(raw)) => {
            let cleaned = sanitize_text(raw);
            if cleaned.is_empty() {
                Err(missing(field))
            } else {
                Ok(cleaned)
            }
        }
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn optional_text(body: &Map<String, Value>, field: &str) -> Result<Option<String>, CoreError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            let cleaned = sanitize_text(raw);
            Ok((!cleaned.is_empty()).then_some(cleaned))
        }
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

/// An optional array of `{role, content}` messages, keeping the most recent
/// `keep_last`. Entries with an unknown role or blank content are skipped.
fn chat_messages(
    body: &Map<String, Value>,
    field: &str,
    keep_last: usize,
) -> Result<Vec<ChatMessage>, CoreError> {
    let items = match body.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(wrong_type(field, "an array")),
    };

    let mut messages: Vec<ChatMessage> = items
        .iter()
        .filter_map(|item| {
            let role = ChatRole::parse(item.get("role")?.as_str()?)?;
            let content = sanitize_text(item.get("content")?.as_str()?);
            (!content.is_empty()).then_some(ChatMessage { role, content })
        })
        .collect();
    let excess = messages.len().saturating_sub(keep_last);
    messages.drain(..excess);
    Ok(messages)
}

fn required_conversation(
    body: &Map<String, Value>,
    field: &str,
) -> Result<Vec<ChatMessage>, CoreError> {
    let messages = chat_messages(body, field, MAX_CONVERSATION_MESSAGES)?;
    if messages.is_empty() {
        return Err(missing(field));
    }
    Ok(messages)
}

/// `roadmapItems` may hold plain strings or objects with a `title`.
fn roadmap_titles(body: &Map<String, Value>) -> Result<Vec<String>, CoreError> {
    let items = match body.get("roadmapItems") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(wrong_type("roadmapItems", "an array")),
    };

    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("title").and_then(Value::as_str),
            _ => None,
        })
        .map(|title| sanitize_with_limit(title, MAX_TITLE_LEN))
        .filter(|title| !title.is_empty())
        .take(MAX_ROADMAP_ITEMS)
        .collect())
}

fn platform(body: &Map<String, Value>) -> Result<&'static str, CoreError> {
    match body.get("platform") {
        None | Some(Value::Null) => Ok(DEFAULT_PLATFORM),
        Some(Value::String(raw)) => resolve_platform(raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid platform '{}'. Must be one of: {}",
                sanitize_with_limit(raw, 50),
                DEPLOYMENT_PLATFORMS.join(", ")
            ))
        }),
        Some(_) => Err(wrong_type("platform", "a string")),
    }
}

/// Parse `imageData` as `data:<media type>;base64,<payload>`.
fn image_input(body: &Map<String, Value>) -> Result<ImageInput, CoreError> {
    let raw = match body.get("imageData") {
        None | Some(Value::Null) => return Err(missing("imageData")),
        Some(Value::String(raw)) => raw.trim(),
        Some(_) => return Err(wrong_type("imageData", "a string")),
    };

    let invalid = || {
        CoreError::Validation(
            "Field 'imageData' must be a base64 data URL (data:image/png;base64,...)".to_string(),
        )
    };

    let rest = raw.strip_prefix("data:").ok_or_else(invalid)?;
    let (media_type, data) = rest.split_once(";base64,").ok_or_else(invalid)?;
    let media_type = media_type.to_ascii_lowercase();

    if !IMAGE_MEDIA_TYPES.contains(&media_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported image type '{}'. Must be one of: {}",
            sanitize_with_limit(&media_type, 50),
            IMAGE_MEDIA_TYPES.join(", ")
        )));
    }
    if data.is_empty() || !data.bytes().all(is_base64_byte) {
        return Err(invalid());
    }

    Ok(ImageInput {
        media_type,
        data: data.to_string(),
    })
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn every_action_round_trips_through_parse() {
        for action in GenerationAction::ALL {
            assert_eq!(GenerationAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = GenerationInput::from_body(&body(json!({ "action": "delete_everything" })));
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.starts_with("Invalid action"));
    }

    #[test]
    fn action_match_is_exact() {
        assert_eq!(GenerationAction::parse("Chat"), None);
        assert_eq!(GenerationAction::parse(" chat"), None);
    }

    #[test]
    fn missing_action_is_rejected() {
        let err = GenerationInput::from_body(&body(json!({ "message": "hi" })));
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("'action'"));
    }

    #[test]
    fn roadmap_requires_prd_content() {
        let err = GenerationInput::from_body(&body(json!({ "action": "roadmap" })));
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("prdContent"));

        let blank = GenerationInput::from_body(&body(json!({ "action": "roadmap", "prdContent": " <> " })));
        assert!(blank.is_err());

        let wrong = GenerationInput::from_body(&body(json!({ "action": "roadmap", "prdContent": 7 })));
        assert_matches!(wrong, Err(CoreError::Validation(msg)) if msg.contains("must be a string"));
    }

    #[test]
    fn chat_sanitises_and_trims_history() {
        let history: Vec<Value> = (0..30)
            .map(|i| json!({ "role": if i % 2 == 0 { "user" } else { "assistant" }, "content": format!("m{i}") }))
            .collect();
        let input = GenerationInput::from_body(&body(json!({
            "action": "chat",
            "message": "<script>hi</script>",
            "history": history,
        })))
        .unwrap();

        let GenerationInput::Chat { message, history, .. } = &input else {
            panic!("expected chat input");
        };
        assert_eq!(message, "scripthi/script");
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(history.last().unwrap().content, "m29");
    }

    #[test]
    fn long_history_keeps_newest_turns() {
        let history: Vec<Value> = (0..250)
            .map(|i| json!({ "role": "user", "content": format!("m{i}") }))
            .collect();
        let input = GenerationInput::from_body(&body(json!({
            "action": "chat",
            "message": "next",
            "history": history,
        })))
        .unwrap();

        let GenerationInput::Chat { history, .. } = &input else {
            panic!("expected chat input");
        };
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(history.first().unwrap().content, "m230");
        assert_eq!(history.last().unwrap().content, "m249");
    }

    #[test]
    fn long_conversation_keeps_newest_messages() {
        let messages: Vec<Value> = (0..250)
            .map(|i| json!({ "role": "user", "content": format!("m{i}") }))
            .collect();
        let input = GenerationInput::from_body(&body(json!({
            "action": "summary",
            "messages": messages,
        })))
        .unwrap();

        let GenerationInput::Summary { messages } = &input else {
            panic!("expected summary input");
        };
        assert_eq!(messages.len(), MAX_CONVERSATION_MESSAGES);
        assert_eq!(messages.first().unwrap().content, "m50");
        assert_eq!(messages.last().unwrap().content, "m249");
    }

    #[test]
    fn chat_prompt_starts_with_user_turn() {
        let input = GenerationInput::from_body(&body(json!({
            "action": "chat",
            "message": "next",
            "history": [
                { "role": "assistant", "content": "welcome" },
                { "role": "user", "content": "idea" },
                { "role": "assistant", "content": "nice" }
            ],
            "projectContext": "A todo app"
        })))
        .unwrap();
        let prompt = input.build_prompt();
        assert_eq!(prompt.turns.first().unwrap().role, ChatRole::User);
        assert_eq!(prompt.turns.len(), 3);
        assert!(prompt.system.contains("A todo app"));
    }

    #[test]
    fn summary_requires_messages() {
        let err = GenerationInput::from_body(&body(json!({ "action": "summary", "messages": [] })));
        assert!(err.is_err());
        let bad_roles = GenerationInput::from_body(&body(json!({
            "action": "summary",
            "messages": [{ "role": "system", "content": "x" }]
        })));
        assert!(bad_roles.is_err());
        let ok = GenerationInput::from_body(&body(json!({
            "action": "summary",
            "messages": [{ "role": "user", "content": "we want a CRM" }]
        })));
        assert!(ok.is_ok());
    }

    #[test]
    fn tasks_accepts_mixed_roadmap_items() {
        let input = GenerationInput::from_body(&body(json!({
            "action": "tasks",
            "prdContent": "PRD",
            "roadmapItems": ["MVP", { "title": "Beta" }, 3, { "name": "ignored" }]
        })))
        .unwrap();
        assert_matches!(&input, GenerationInput::Tasks { roadmap_items, .. } if roadmap_items == &vec!["MVP".to_string(), "Beta".to_string()]);
        let prompt = input.build_prompt();
        let PromptPart::Text(text) = &prompt.turns[0].parts[0] else {
            panic!("expected text part");
        };
        assert!(text.contains("- MVP"));
        assert!(text.contains("\"priority\" (one of: low, medium, high, urgent)"));
    }

    #[test]
    fn deployment_platform_defaults_and_validates() {
        let default = GenerationInput::from_body(&body(json!({
            "action": "deployment_checklist", "prdContent": "x"
        })))
        .unwrap();
        assert_eq!(
            default.structured_kind(),
            Some(StructuredKind::Deployment { platform: "universal" })
        );

        let explicit = GenerationInput::from_body(&body(json!({
            "action": "deployment_checklist", "prdContent": "x", "platform": "Netlify"
        })))
        .unwrap();
        assert_eq!(
            explicit.structured_kind(),
            Some(StructuredKind::Deployment { platform: "netlify" })
        );

        let invalid = GenerationInput::from_body(&body(json!({
            "action": "deployment_checklist", "prdContent": "x", "platform": "toaster"
        })));
        assert!(invalid.is_err());
    }

    #[test]
    fn image_data_url_is_parsed() {
        let input = GenerationInput::from_body(&body(json!({
            "action": "design_tasks_image",
            "imageData": "data:image/PNG;base64,iVBORw0KGgo="
        })))
        .unwrap();
        let prompt = input.build_prompt();
        assert_matches!(
            &prompt.turns[0].parts[0],
            PromptPart::Image { media_type, data } if media_type == "image/png" && data == "iVBORw0KGgo="
        );
    }

    #[test]
    fn image_data_rejects_non_images_and_bad_payloads() {
        for raw in [
            "data:text/html;base64,PGgxPg==",
            "https://example.com/a.png",
            "data:image/png;base64,",
            "data:image/png;base64,<svg>",
        ] {
            let result = GenerationInput::from_body(&body(json!({
                "action": "design_tasks_image", "imageData": raw
            })));
            assert!(result.is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn structured_flags_match_kinds() {
        for action in GenerationAction::ALL {
            let text_only = matches!(
                action,
                GenerationAction::Chat | GenerationAction::Summary | GenerationAction::Prd
            );
            assert_eq!(action.is_structured(), !text_only);
        }
    }

    #[test]
    fn prd_prompt_includes_project_name_and_transcript() {
        let input = GenerationInput::from_body(&body(json!({
            "action": "prd",
            "projectName": "Kite",
            "messages": [
                { "role": "user", "content": "Build a kite shop" },
                { "role": "assistant", "content": "Who buys kites?" }
            ]
        })))
        .unwrap();
        let prompt = input.build_prompt();
        let PromptPart::Text(text) = &prompt.turns[0].parts[0] else {
            panic!("expected text part");
        };
        assert!(text.contains("\"Kite\""));
        assert!(text.contains("User: Build a kite shop\nAssistant: Who buys kites?"));
    }
}
