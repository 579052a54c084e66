//! In-memory repository for tasks and their history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        HistoryEntry, Relationship, Task, TaskComment, TaskDraft, TaskId, TaskStatus,
        TaskStatusChange,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;

/// Thread-safe in-memory task repository.
///
/// History rows are appended under the same write lock as the change they
/// record, mirroring the `PostgreSQL` triggers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    last_id: i64,
    tasks: BTreeMap<TaskId, Task>,
    history: Vec<HistoryEntry>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(
        &self,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(poisoned)?;
        let id = TaskId::new(state.last_id + 1).map_err(TaskRepositoryError::persistence)?;
        let task = Task::from_draft(id, draft.clone(), created_at);
        state.last_id = id.value();
        state.history.push(HistoryEntry {
            task_id: id,
            status: task.status(),
            changed_by: task.changed_by(),
            changed_at: created_at,
            comment: None,
        });
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn update_status(&self, change: &TaskStatusChange) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let task = state
            .tasks
            .get_mut(&change.task_id)
            .ok_or(TaskRepositoryError::NotFound(change.task_id))?;
        let status_changed = task.status() != change.status;
        task.apply_status(change);
        if status_changed {
            state.history.push(HistoryEntry {
                task_id: change.task_id,
                status: change.status,
                changed_by: change.changed_by,
                changed_at: change.changed_at,
                comment: None,
            });
        }
        Ok(())
    }

    async fn update_comment(
        &self,
        id: TaskId,
        comment: &TaskComment,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        let comment_changed = task
            .comment()
            .is_none_or(|previous| previous.text != comment.text);
        let status = task.status();
        task.apply_comment(comment.clone());
        if comment_changed {
            state.history.push(HistoryEntry {
                task_id: id,
                status,
                changed_by: comment.author,
                changed_at: comment.commented_at,
                comment: Some(comment.text.clone()),
            });
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        relationship: Relationship,
        status: TaskStatus,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.status() == status)
            .filter(|task| match relationship {
                Relationship::Inbox => task.assignee() == user,
                Relationship::Sent => task.owner() == user,
            })
            .cloned()
            .collect())
    }

    async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .history
            .iter()
            .filter(|entry| entry.task_id == id)
            .cloned()
            .collect())
    }
}
