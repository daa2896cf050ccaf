//! In-memory [`VlabApi`] used by the store tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;
use vlab_core::types::DbId;
use vlab_core::workspace::{default_layout, WorkspaceLayout};

use crate::api::VlabApi;
use crate::error::ClientError;
use crate::models::{NewProject, Project, ProjectPatch, User, WorkspaceSnapshot};

pub const VALID_TOKEN: &str = "good-token";

#[derive(Default)]
struct Inner {
    token: Option<String>,
    projects: Vec<Project>,
    workspace_failures: u32,
    workspace_calls: u32,
}

#[derive(Default)]
pub struct FakeApi {
    inner: Mutex<Inner>,
}

fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        code: None,
        message: message.to_string(),
    }
}

pub fn project(name: &str) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        owner_id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        is_archived: false,
        workspace_layout: default_layout(),
        created_at: now,
        updated_at: now,
    }
}

impl FakeApi {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let fake = Self::default();
        fake.lock().projects = projects;
        fake
    }

    /// Make the next `n` workspace loads fail with a 500.
    pub fn fail_workspace(&self, n: u32) {
        self.lock().workspace_failures = n;
    }

    pub fn workspace_calls(&self) -> u32 {
        self.lock().workspace_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn authorize(&self) -> Result<(), ClientError> {
        match self.lock().token.as_deref() {
            Some(VALID_TOKEN) => Ok(()),
            _ => Err(api_error(401, "Invalid token")),
        }
    }

    fn modify(
        &self,
        id: DbId,
        f: impl FnOnce(&mut Project),
    ) -> Result<Project, ClientError> {
        self.authorize()?;
        let mut inner = self.lock();
        let project = inner
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| api_error(404, "Project not found"))?;
        f(project);
        project.updated_at = Utc::now();
        Ok(project.clone())
    }
}

#[async_trait]
impl VlabApi for FakeApi {
    fn set_token(&self, token: Option<String>) {
        self.lock().token = token;
    }

    fn has_token(&self) -> bool {
        self.lock().token.is_some()
    }

    async fn me(&self) -> Result<User, ClientError> {
        self.authorize()?;
        let now = Utc::now();
        Ok(User {
            id: Uuid::nil(),
            email: Some("dev@example.test".into()),
            display_name: Some("Dev".into()),
            avatar_url: None,
            is_anonymous: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_projects(&self, include_archived: bool) -> Result<Vec<Project>, ClientError> {
        self.authorize()?;
        Ok(self
            .lock()
            .projects
            .iter()
            .filter(|p| include_archived || !p.is_archived)
            .cloned()
            .collect())
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, ClientError> {
        self.authorize()?;
        if input.name.trim().is_empty() {
            return Err(api_error(400, "Project name must not be empty"));
        }
        let mut created = project(&input.name);
        created.description = input.description.clone();
        self.lock().projects.insert(0, created.clone());
        Ok(created)
    }

    async fn update_project(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Project, ClientError> {
        self.modify(id, |p| {
            if let Some(name) = &patch.name {
                p.name = name.clone();
            }
            if let Some(description) = &patch.description {
                p.description = Some(description.clone());
            }
        })
    }

    async fn archive_project(&self, id: DbId) -> Result<Project, ClientError> {
        self.modify(id, |p| p.is_archived = true)
    }

    async fn restore_project(&self, id: DbId) -> Result<Project, ClientError> {
        self.modify(id, |p| p.is_archived = false)
    }

    async fn delete_project(&self, id: DbId) -> Result<(), ClientError> {
        self.authorize()?;
        let mut inner = self.lock();
        let before = inner.projects.len();
        inner.projects.retain(|p| p.id != id);
        if inner.projects.len() == before {
            return Err(api_error(404, "Project not found"));
        }
        Ok(())
    }

    async fn update_layout(
        &self,
        id: DbId,
        layout: &WorkspaceLayout,
    ) -> Result<Project, ClientError> {
        self.modify(id, |p| p.workspace_layout = layout.clone())
    }

    async fn workspace(&self, id: DbId) -> Result<WorkspaceSnapshot, ClientError> {
        self.authorize()?;
        let mut inner = self.lock();
        inner.workspace_calls += 1;
        if inner.workspace_failures > 0 {
            inner.workspace_failures -= 1;
            return Err(api_error(500, "An internal error occurred"));
        }
        let project = inner
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| api_error(404, "Project not found"))?;
        Ok(WorkspaceSnapshot {
            project,
            prds: Vec::new(),
            roadmap: Vec::new(),
            tasks: Vec::new(),
            notes: Vec::new(),
            prompts: Vec::new(),
            secrets: Vec::new(),
            deployment: Vec::new(),
        })
    }

    async fn generate(&self, _body: &Map<String, Value>) -> Result<Value, ClientError> {
        self.authorize()?;
        Ok(Value::String("ok".into()))
    }
}
