//! The open project's workspace snapshot.

use std::sync::Arc;

use vlab_core::load_state::{AttemptCounter, LoadState};
use vlab_core::types::DbId;

use crate::api::VlabApi;
use crate::error::ClientError;
use crate::models::WorkspaceSnapshot;

pub struct WorkspaceStore {
    api: Arc<dyn VlabApi>,
    project_id: Option<DbId>,
    snapshot: Option<WorkspaceSnapshot>,
    attempts: AttemptCounter,
    state: LoadState,
}

impl WorkspaceStore {
    pub fn new(api: Arc<dyn VlabApi>) -> Self {
        Self {
            api,
            project_id: None,
            snapshot: None,
            attempts: AttemptCounter::default(),
            state: LoadState::Idle,
        }
    }

    pub fn snapshot(&self) -> Option<&WorkspaceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn project_id(&self) -> Option<DbId> {
        self.project_id
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.attempts()
    }

    /// `true` after a failed load while attempts remain.
    pub fn can_retry(&self) -> bool {
        self.state.error().is_some() && self.attempts.can_retry()
    }

    /// Load the snapshot for `project_id`. Switching projects drops the
    /// previous snapshot and starts a fresh attempt count.
    pub async fn load(&mut self, project_id: DbId) -> Result<(), ClientError> {
        if self.project_id != Some(project_id) {
            self.project_id = Some(project_id);
            self.snapshot = None;
            self.attempts.reset();
        }
        self.fetch(project_id).await
    }

    /// Repeat the last failed load.
    pub async fn retry(&mut self) -> Result<(), ClientError> {
        let project_id = match (self.project_id, self.state.error()) {
            (Some(id), Some(_)) => id,
            _ => return Err(ClientError::NothingToRetry),
        };
        if !self.attempts.can_retry() {
            return Err(ClientError::RetriesExhausted {
                attempts: self.attempts.attempts(),
            });
        }
        self.fetch(project_id).await
    }

    async fn fetch(&mut self, project_id: DbId) -> Result<(), ClientError> {
        self.attempts.record();
        self.state.begin();

        match self.state.settle(self.api.workspace(project_id).await) {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.attempts.reset();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    project_id = %project_id,
                    attempt = self.attempts.attempts(),
                    error = %e,
                    "Workspace load failed"
                );
                Err(e)
            }
        }
    }
}
