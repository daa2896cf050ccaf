//! Handler for the LLM generation proxy.

use axum::extract::{Request, State};
use axum::Json;
use serde_json::Value;
use vlab_core::generation::GenerationInput;
use vlab_core::normalize::normalize_output;
use vlab_llm::LlmError;

use crate::error::{AppError, AppResult};
use crate::extract::read_json_object;
use crate::middleware::auth::AuthUser;
use crate::response::ResultResponse;
use crate::state::AppState;

/// POST /api/v1/generate
///
/// Steps run in a fixed order and each can short-circuit: auth (extractor),
/// rate limit, body guards, action allow-list and field validation, then
/// exactly one upstream call. Nothing reaches the model until every check
/// has passed.
pub async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
) -> AppResult<Json<ResultResponse<Value>>> {
    let remaining = state
        .rate_limiter
        .check(auth.user_id)
        .await?
        .into_result()
        .inspect_err(|_| tracing::info!(user_id = %auth.user_id, "Generation rate limited"))?;

    let body = read_json_object(request).await?;
    let input = GenerationInput::from_body(&body)?;
    let action = input.action();
    tracing::info!(user_id = %auth.user_id, action = %action, remaining, "Generation request");

    let prompt = input.build_prompt();
    let reply = state.llm.complete(&prompt).await;

    let Some(kind) = input.structured_kind() else {
        let text = reply?;
        return Ok(Json(ResultResponse {
            result: Value::String(text),
        }));
    };

    let raw = match reply {
        Ok(text) => text,
        // An empty structured reply degrades to the fallback list.
        Err(LlmError::EmptyResponse) => String::new(),
        Err(e) => return Err(AppError::Llm(e)),
    };

    let normalized = normalize_output(&raw, kind);
    if normalized.used_fallback {
        tracing::warn!(
            user_id = %auth.user_id,
            action = %action,
            "Model output unusable, returning fallback items"
        );
    }
    Ok(Json(ResultResponse {
        result: Value::Array(normalized.items),
    }))
}
