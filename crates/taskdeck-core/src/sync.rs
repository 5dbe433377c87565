//! Task sync engine.
//!
//! Holds the local task list and keeps it equal to the last completed fetch.
//! Every successful create, update or delete is followed by a full reload;
//! server responses to mutations are never merged into the local list.

use std::fmt;

use crate::api::tasks::Task;
use crate::api::{ApiClient, ApiError};
use crate::session::Session;

/// Failure of a mutating call, split by which half of the write-then-reload
/// sequence failed.
#[derive(Debug, Clone)]
pub enum SyncError {
    /// The mutation itself was rejected or never reached the service.
    Write(ApiError),
    /// The mutation completed but the follow-up reload failed; the local list
    /// still holds the previous snapshot.
    Reload(ApiError),
}

impl SyncError {
    pub fn api_error(&self) -> &ApiError {
        match self {
            SyncError::Write(err) | SyncError::Reload(err) => err,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Write(err) => write!(f, "write failed: {err}"),
            SyncError::Reload(err) => write!(f, "reload after write failed: {err}"),
        }
    }
}

impl std::error::Error for SyncError {}

pub struct TaskSync {
    client: ApiClient,
    session: Session,
    tasks: Vec<Task>,
    reloads: u64,
}

impl TaskSync {
    pub fn new(client: ApiClient, session: Session) -> Self {
        Self {
            client,
            session,
            tasks: Vec::new(),
            reloads: 0,
        }
    }

    /// Snapshot from the most recent completed fetch.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of completed full reloads.
    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current token, if any. A store that can't be read counts as signed out.
    fn bearer(&self) -> Option<String> {
        match self.session.get() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "could not read session token");
                None
            }
        }
    }

    /// Fetches the full list and replaces the local copy.
    pub async fn list(&mut self) -> Result<&[Task], ApiError> {
        let token = self.bearer();
        let tasks = self.client.list_tasks(token.as_deref()).await?;
        self.reloads += 1;
        tracing::debug!(count = tasks.len(), reloads = self.reloads, "task list reloaded");
        self.tasks = tasks;
        Ok(&self.tasks)
    }

    /// Reload that follows a completed write.
    async fn reload_after_write(&mut self) -> Result<&[Task], SyncError> {
        self.list().await.map_err(SyncError::Reload)
    }

    pub async fn create(&mut self, title: &str, description: &str) -> Result<&[Task], SyncError> {
        let token = self.bearer();
        self.client
            .create_task(token.as_deref(), title, description)
            .await
            .map_err(SyncError::Write)?;
        tracing::info!("task created");
        self.reload_after_write().await
    }

    pub async fn update(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<&[Task], SyncError> {
        let token = self.bearer();
        self.client
            .update_task(token.as_deref(), id, title, description)
            .await
            .map_err(SyncError::Write)?;
        tracing::info!(task_id = id, "task updated");
        self.reload_after_write().await
    }

    pub async fn delete(&mut self, id: &str) -> Result<&[Task], SyncError> {
        let token = self.bearer();
        self.client
            .delete_task(token.as_deref(), id)
            .await
            .map_err(SyncError::Write)?;
        tracing::info!(task_id = id, "task deleted");
        self.reload_after_write().await
    }
}
