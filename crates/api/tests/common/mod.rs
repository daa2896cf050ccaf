#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;
use vlab_core::generation::{Prompt, PromptPart};
use vlab_core::rate_limit::{InMemoryRateLimiter, RateLimitPolicy};
use vlab_llm::{LlmClient, LlmError};

use vlab_api::auth::jwt::{claims_for, encode_token, JwtConfig, DEFAULT_AUDIENCE};
use vlab_api::config::{RateLimitBackend, ServerConfig};
use vlab_api::router::build_app_router;
use vlab_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-bytes";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        },
        rate_limit: RateLimitPolicy::default(),
        rate_limit_backend: RateLimitBackend::Memory,
        workspace_module_timeout_secs: 5,
    }
}

/// LLM stand-in that returns a canned reply and records every prompt.
pub struct StubLlm {
    reply: Mutex<Result<String, LlmError>>,
    calls: Mutex<Vec<Prompt>>,
}

impl StubLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Ok(text.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: LlmError) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Err(err)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// System prompt plus every text part of the last call.
    pub fn last_prompt_text(&self) -> String {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        let prompt = calls.last().expect("LLM was never called");
        let mut out = prompt.system.clone();
        for turn in &prompt.turns {
            for part in &turn.parts {
                if let PromptPart::Text(text) = part {
                    out.push('\n');
                    out.push_str(text);
                }
            }
        }
        out
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());
        self.reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Build the full application router using the production middleware stack,
/// a stub LLM replying `"ok"`, and the default quota.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, StubLlm::replying("ok"), RateLimitPolicy::default())
}

/// Build the application router with a specific LLM stub and quota.
pub fn build_test_app_with(pool: PgPool, llm: Arc<StubLlm>, policy: RateLimitPolicy) -> Router {
    let mut config = test_config();
    config.rate_limit = policy;

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        llm,
        rate_limiter: Arc::new(InMemoryRateLimiter::new(policy)),
    };
    build_app_router(state, &config)
}

pub fn policy(quota: u32, window_secs: u64) -> RateLimitPolicy {
    RateLimitPolicy {
        quota,
        window: Duration::from_secs(window_secs),
    }
}

/// A valid bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    let config = test_config();
    let claims = claims_for(
        user_id,
        Some(&format!("{user_id}@example.test")),
        DEFAULT_AUDIENCE,
        300,
    );
    encode_token(&claims, &config.jwt).expect("token generation should succeed")
}

/// A fresh user id together with a token for it.
pub fn new_user() -> (Uuid, String) {
    let id = Uuid::new_v4();
    (id, token_for(id))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a JSON body with `method`, authenticated when `token` is given.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, Some(token), body).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
