//! Task board: cached task and executor lists plus mutations that keep them
//! in step with the backend.

use std::sync::Arc;

use pulse_client::PulseClient;
use pulse_client::wire::{NewTask, TaskPatch};
use pulse_core::entities::{Executor, Task, TaskId, Upload};
use pulse_core::enums::{TaskStatus, UserRole};
use pulse_core::projection::{Counterparty, CounterpartyDirectory, TaskFilters, TaskQuery, project};

use crate::cache::{QueryCache, QueryKey};
use crate::error::SyncError;

/// A projected task with its counterparty resolved for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub task: Task,
    pub counterparty: Counterparty,
}

#[derive(Debug)]
pub struct TaskBoard {
    client: Arc<PulseClient>,
    tasks: Arc<QueryCache<Vec<Task>>>,
    executors: Arc<QueryCache<Vec<Executor>>>,
}

impl TaskBoard {
    #[must_use]
    pub fn new(client: Arc<PulseClient>) -> Self {
        Self::with_caches(client, Arc::default(), Arc::default())
    }

    /// Board sharing caches with other views.
    #[must_use]
    pub const fn with_caches(
        client: Arc<PulseClient>,
        tasks: Arc<QueryCache<Vec<Task>>>,
        executors: Arc<QueryCache<Vec<Executor>>>,
    ) -> Self {
        Self {
            client,
            tasks,
            executors,
        }
    }

    #[must_use]
    pub fn client(&self) -> &PulseClient {
        &self.client
    }

    #[must_use]
    pub fn task_cache(&self) -> &QueryCache<Vec<Task>> {
        &self.tasks
    }

    fn role(&self) -> Result<UserRole, SyncError> {
        self.client.session().role().ok_or(SyncError::SignedOut)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Tasks matching `filters`, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the fetch failed.
    pub async fn load(&self, filters: &TaskFilters) -> Result<Arc<Vec<Task>>, SyncError> {
        let client = &self.client;
        self.tasks
            .fetch(&QueryKey::tasks(filters), || client.list_tasks(filters))
            .await
    }

    /// Fetch tasks matching `filters` now.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the fetch failed.
    pub async fn reload(&self, filters: &TaskFilters) -> Result<Arc<Vec<Task>>, SyncError> {
        let client = &self.client;
        self.tasks
            .refetch(&QueryKey::tasks(filters), || client.list_tasks(filters))
            .await
    }

    /// The creator's executors. Executors have no roster and get an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the fetch failed.
    pub async fn executors(&self) -> Result<Arc<Vec<Executor>>, SyncError> {
        if self.role()? != UserRole::Creator {
            return Ok(Arc::new(Vec::new()));
        }
        let client = &self.client;
        self.executors
            .fetch(&QueryKey::executors(), || client.list_executors())
            .await
    }

    /// Load, search, and sort tasks for display.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SignedOut`] without a session, otherwise any
    /// fetch failure.
    pub async fn view(&self, filters: &TaskFilters, query: &TaskQuery) -> Result<Vec<TaskRow>, SyncError> {
        let role = self.role()?;
        let tasks = self.load(filters).await?;
        let executors = self.executors().await?;
        let directory = CounterpartyDirectory::for_role(role, &executors, &tasks);

        let rows = project(&tasks, &directory, query)
            .into_iter()
            .map(|task| TaskRow {
                counterparty: directory.counterparty(task),
                task: task.clone(),
            })
            .collect();
        Ok(rows)
    }

    /// A single task, always fetched.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn task(&self, id: TaskId) -> Result<Task, SyncError> {
        Ok(self.client.get_task(id).await?)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    fn tasks_changed(&self) {
        self.tasks.invalidate_prefix(&QueryKey::tasks_root());
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn create(&self, task: &NewTask) -> Result<Task, SyncError> {
        let created = self.client.create_task(task).await?;
        self.tasks_changed();
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, SyncError> {
        let updated = self.client.update_task(id, patch).await?;
        self.tasks_changed();
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed or the transition was refused.
    pub async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, SyncError> {
        let updated = self.client.set_task_status(id, status).await?;
        self.tasks_changed();
        Ok(updated)
    }

    /// Mark a task done.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn complete(&self, id: TaskId) -> Result<Task, SyncError> {
        self.set_status(id, TaskStatus::Done).await
    }

    /// Leave an executor comment on a task.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn comment(&self, id: TaskId, comment: &str) -> Result<Task, SyncError> {
        self.update(id, &TaskPatch::comment(comment)).await
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn confirm_on_time(&self, id: TaskId) -> Result<Task, SyncError> {
        let updated = self.client.confirm_on_time(id).await?;
        self.tasks_changed();
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed or the extension was refused.
    pub async fn request_extension(&self, id: TaskId, comment: &str) -> Result<Task, SyncError> {
        let updated = self.client.request_extension(id, comment).await?;
        self.tasks_changed();
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns [`SyncError`] if the upload failed.
    pub async fn upload_attachment(&self, id: TaskId, file: &Upload) -> Result<(), SyncError> {
        self.client.upload_attachment(id, file).await?;
        self.tasks_changed();
        Ok(())
    }

    /// Invite an executor by email and refresh the roster on next read.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the request failed.
    pub async fn invite_executor(&self, email: &str) -> Result<Option<String>, SyncError> {
        let ack = self.client.invite_executor(email).await?;
        self.executors.invalidate_prefix(&QueryKey::executors());
        Ok(ack.detail)
    }
}
