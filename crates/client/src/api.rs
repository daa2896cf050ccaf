//! HTTP access to `/api/v1`.
//!
//! [`VlabApi`] is what the stores depend on; [`ApiClient`] implements it
//! with [`reqwest`], attaching the bearer token when one is set and
//! unwrapping the server's `{ "data": ... }` envelope.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use vlab_core::types::DbId;
use vlab_core::workspace::WorkspaceLayout;

use crate::error::ClientError;
use crate::models::{NewProject, Project, ProjectPatch, User, WorkspaceSnapshot};

/// Applied to every request made by [`ApiClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept when the server did not send JSON.
const MAX_ERROR_BODY: usize = 512;

/// Operations the client stores need from the server.
#[async_trait]
pub trait VlabApi: Send + Sync {
    /// Replace the bearer token sent with later requests.
    fn set_token(&self, token: Option<String>);

    fn has_token(&self) -> bool;

    async fn me(&self) -> Result<User, ClientError>;

    async fn list_projects(&self, include_archived: bool) -> Result<Vec<Project>, ClientError>;

    async fn create_project(&self, input: &NewProject) -> Result<Project, ClientError>;

    async fn update_project(&self, id: DbId, patch: &ProjectPatch)
        -> Result<Project, ClientError>;

    async fn archive_project(&self, id: DbId) -> Result<Project, ClientError>;

    async fn restore_project(&self, id: DbId) -> Result<Project, ClientError>;

    async fn delete_project(&self, id: DbId) -> Result<(), ClientError>;

    async fn update_layout(
        &self,
        id: DbId,
        layout: &WorkspaceLayout,
    ) -> Result<Project, ClientError>;

    async fn workspace(&self, id: DbId) -> Result<WorkspaceSnapshot, ClientError>;

    /// `POST /generate`; returns the `result` field (a string or an array).
    async fn generate(&self, body: &Map<String, Value>) -> Result<Value, ClientError>;
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ResultEnvelope {
    result: Value,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

/// HTTP client for one VLab server.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client for `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("vlab-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_data<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::ensure_success(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        let envelope: DataEnvelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }

    /// Turn a non-2xx response into [`ClientError::Api`], preferring the
    /// server's `{ error, code }` body.
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (message, code) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, body.code),
            Err(_) => (text.chars().take(MAX_ERROR_BODY).collect(), None),
        };
        tracing::debug!(status = status.as_u16(), ?code, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl VlabApi for ApiClient {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    async fn me(&self) -> Result<User, ClientError> {
        Self::fetch_data(self.request(Method::GET, "/me")).await
    }

    async fn list_projects(&self, include_archived: bool) -> Result<Vec<Project>, ClientError> {
        let builder = self
            .request(Method::GET, "/projects")
            .query(&[("include_archived", include_archived)]);
        Self::fetch_data(builder).await
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, ClientError> {
        Self::fetch_data(self.request(Method::POST, "/projects").json(input)).await
    }

    async fn update_project(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Project, ClientError> {
        let path = format!("/projects/{id}");
        Self::fetch_data(self.request(Method::PUT, &path).json(patch)).await
    }

    async fn archive_project(&self, id: DbId) -> Result<Project, ClientError> {
        let path = format!("/projects/{id}/archive");
        Self::fetch_data(self.request(Method::POST, &path)).await
    }

    async fn restore_project(&self, id: DbId) -> Result<Project, ClientError> {
        let path = format!("/projects/{id}/restore");
        Self::fetch_data(self.request(Method::POST, &path)).await
    }

    async fn delete_project(&self, id: DbId) -> Result<(), ClientError> {
        let path = format!("/projects/{id}");
        let response = self.request(Method::DELETE, &path).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn update_layout(
        &self,
        id: DbId,
        layout: &WorkspaceLayout,
    ) -> Result<Project, ClientError> {
        let path = format!("/projects/{id}/layout");
        Self::fetch_data(self.request(Method::PUT, &path).json(layout)).await
    }

    async fn workspace(&self, id: DbId) -> Result<WorkspaceSnapshot, ClientError> {
        let path = format!("/projects/{id}/workspace");
        Self::fetch_data(self.request(Method::GET, &path)).await
    }

    async fn generate(&self, body: &Map<String, Value>) -> Result<Value, ClientError> {
        let response = self
            .request(Method::POST, "/generate")
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        let envelope: ResultEnvelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.result)
    }
}
