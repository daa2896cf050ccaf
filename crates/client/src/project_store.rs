//! The signed-in user's project list.
//!
//! Every successful mutation patches the local list with the server's copy
//! of the project; the last write wins.

use std::sync::Arc;

use vlab_core::load_state::LoadState;
use vlab_core::types::DbId;
use vlab_core::workspace::WorkspaceLayout;

use crate::api::VlabApi;
use crate::error::ClientError;
use crate::models::{NewProject, Project, ProjectPatch};

pub struct ProjectStore {
    api: Arc<dyn VlabApi>,
    projects: Vec<Project>,
    include_archived: bool,
    state: LoadState,
}

impl ProjectStore {
    pub fn new(api: Arc<dyn VlabApi>) -> Self {
        Self {
            api,
            projects: Vec::new(),
            include_archived: false,
            state: LoadState::Idle,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: DbId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub async fn fetch_projects(&mut self, include_archived: bool) -> Result<(), ClientError> {
        self.state.begin();
        let projects = self
            .state
            .settle(self.api.list_projects(include_archived).await)?;
        self.projects = projects;
        self.include_archived = include_archived;
        Ok(())
    }

    /// New projects go to the front, matching the server's newest-first order.
    pub async fn create_project(&mut self, input: NewProject) -> Result<Project, ClientError> {
        self.state.begin();
        let project = self.state.settle(self.api.create_project(&input).await)?;
        self.projects.insert(0, project.clone());
        Ok(project)
    }

    pub async fn update_project(
        &mut self,
        id: DbId,
        patch: ProjectPatch,
    ) -> Result<Project, ClientError> {
        self.state.begin();
        let project = self.state.settle(self.api.update_project(id, &patch).await)?;
        self.apply(project.clone());
        Ok(project)
    }

    pub async fn archive_project(&mut self, id: DbId) -> Result<Project, ClientError> {
        self.state.begin();
        let project = self.state.settle(self.api.archive_project(id).await)?;
        self.apply(project.clone());
        Ok(project)
    }

    pub async fn restore_project(&mut self, id: DbId) -> Result<Project, ClientError> {
        self.state.begin();
        let project = self.state.settle(self.api.restore_project(id).await)?;
        self.apply(project.clone());
        Ok(project)
    }

    pub async fn delete_project(&mut self, id: DbId) -> Result<(), ClientError> {
        self.state.begin();
        self.state.settle(self.api.delete_project(id).await)?;
        self.projects.retain(|p| p.id != id);
        Ok(())
    }

    pub async fn update_layout(
        &mut self,
        id: DbId,
        layout: WorkspaceLayout,
    ) -> Result<Project, ClientError> {
        self.state.begin();
        let project = self.state.settle(self.api.update_layout(id, &layout).await)?;
        self.apply(project.clone());
        Ok(project)
    }

    /// Replace, insert or drop `project` so the list matches what the last
    /// fetch would now return.
    fn apply(&mut self, project: Project) {
        let visible = self.include_archived || !project.is_archived;
        let existing = self.projects.iter().position(|p| p.id == project.id);
        match (existing, visible) {
            (Some(i), true) => self.projects[i] = project,
            (Some(i), false) => {
                self.projects.remove(i);
            }
            (None, true) => {
                let at = self
                    .projects
                    .iter()
                    .position(|p| p.created_at < project.created_at)
                    .unwrap_or(self.projects.len());
                self.projects.insert(at, project);
            }
            (None, false) => {}
        }
    }
}
