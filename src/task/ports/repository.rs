//! Repository port for task persistence and history queries.

use crate::task::domain::{
    HistoryEntry, Relationship, Task, TaskComment, TaskDraft, TaskId, TaskStatus,
    TaskStatusChange,
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations append a [`HistoryEntry`] on creation, on every status
/// change, and on every comment change.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task with status `New` and returns it with its number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the write fails.
    async fn create(
        &self,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Finds a task by number.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Changes the status of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_status(&self, change: &TaskStatusChange) -> TaskRepositoryResult<()>;

    /// Replaces the latest comment of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_comment(&self, id: TaskId, comment: &TaskComment)
    -> TaskRepositoryResult<()>;

    /// Lists tasks in `status` where `user` is the assignee (`Inbox`) or the
    /// owner (`Sent`), ordered by task number.
    async fn list_for_user(
        &self,
        relationship: Relationship,
        status: TaskStatus,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the audit history of a task, oldest first.
    async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
