//! Service layer enforcing the workflow rule table on every task operation.

use crate::task::{
    domain::{
        HistoryEntry, Relationship, Task, TaskAction, TaskComment, TaskDomainError, TaskDraft,
        TaskId, TaskStatus, TaskStatusChange, rules,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// A task as seen by one viewer, with the actions that viewer may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// The task snapshot.
    pub task: Task,
    /// How the viewer relates to the task.
    pub relationship: Relationship,
    /// Allowed actions for the viewer, in display order.
    pub actions: &'static [TaskAction],
}

impl TaskView {
    /// Builds the view of `task` for `viewer`, or `None` when the viewer is
    /// neither owner nor assignee.
    #[must_use]
    pub fn of(task: Task, viewer: UserId) -> Option<Self> {
        let relationship = task.relationship_to(viewer)?;
        let actions = rules::allowed_actions(relationship, task.status());
        Some(Self {
            task,
            relationship,
            actions,
        })
    }
}

/// Service-level errors for task workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// No task has this number.
    #[error("Can't find any task with ID {0}")]
    NotFound(TaskId),
    /// The viewer is neither owner nor assignee.
    #[error("Access denied for task #{task_id}")]
    AccessDenied {
        /// The requested task.
        task_id: TaskId,
        /// The caller.
        viewer: UserId,
    },
    /// The action is not in the allowed set for the viewer and status.
    #[error("action {action} is not allowed in the current task status")]
    ActionNotAllowed {
        /// The rejected action.
        action: TaskAction,
        /// The unchanged task as the viewer sees it.
        view: Box<TaskView>,
    },
    /// A side action was submitted as a status transition.
    #[error("{0} does not change task status")]
    NotATransition(TaskAction),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Task workflow orchestration service.
#[derive(Clone)]
pub struct TaskWorkflowService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskWorkflowService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task workflow service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Persists a new task in status `New`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the write fails.
    pub async fn create(&self, draft: TaskDraft) -> TaskWorkflowResult<Task> {
        let task = self.repository.create(&draft, self.clock.utc()).await?;
        info!(
            task_id = %task.id(),
            identity = %task.owner(),
            assignee = %task.assignee(),
            "task created"
        );
        Ok(task)
    }

    /// Loads a task as seen by `viewer`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotFound`] for unknown numbers and
    /// [`TaskWorkflowError::AccessDenied`] for foreign tasks.
    pub async fn view(&self, viewer: UserId, id: TaskId) -> TaskWorkflowResult<TaskView> {
        let task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskWorkflowError::NotFound(id))?;
        TaskView::of(task, viewer).ok_or(TaskWorkflowError::AccessDenied {
            task_id: id,
            viewer,
        })
    }

    /// Checks that `viewer` may perform `action` on the task right now.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::ActionNotAllowed`] carrying the current
    /// view when the rule table forbids the action, plus the errors of
    /// [`Self::view`].
    pub async fn authorize(
        &self,
        viewer: UserId,
        id: TaskId,
        action: TaskAction,
    ) -> TaskWorkflowResult<TaskView> {
        let view = self.view(viewer, id).await?;
        if !view.actions.contains(&action) {
            debug!(identity = %viewer, task_id = %id, action = action.label(), "action rejected");
            return Err(TaskWorkflowError::ActionNotAllowed {
                action,
                view: Box::new(view),
            });
        }
        Ok(view)
    }

    /// Applies a status-changing action and returns the updated view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::NotATransition`] for side actions, the
    /// errors of [`Self::authorize`], or [`TaskWorkflowError::Repository`]
    /// when the write fails. A rejected action leaves the task untouched.
    pub async fn transition(
        &self,
        viewer: UserId,
        id: TaskId,
        action: TaskAction,
    ) -> TaskWorkflowResult<TaskView> {
        let status = action
            .target_status()
            .ok_or(TaskWorkflowError::NotATransition(action))?;
        let mut view = self.authorize(viewer, id, action).await?;
        let change = TaskStatusChange {
            task_id: id,
            status,
            changed_by: viewer,
            changed_at: self.clock.utc(),
        };
        self.repository.update_status(&change).await?;
        view.task.apply_status(&change);
        view.actions = rules::allowed_actions(view.relationship, status);
        info!(identity = %viewer, task_id = %id, status = %status, "task status changed");
        Ok(view)
    }

    /// Replaces the latest comment on a task.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::authorize`] for the `Comment` action, or
    /// [`TaskWorkflowError::Repository`] when the write fails.
    pub async fn comment(
        &self,
        viewer: UserId,
        id: TaskId,
        text: &str,
    ) -> TaskWorkflowResult<Task> {
        let mut view = self.authorize(viewer, id, TaskAction::Comment).await?;
        let comment = TaskComment {
            text: text.trim().to_owned(),
            author: viewer,
            commented_at: self.clock.utc(),
        };
        self.repository.update_comment(id, &comment).await?;
        view.task.apply_comment(comment);
        info!(identity = %viewer, task_id = %id, "task commented");
        Ok(view.task)
    }

    /// Returns the audit history of a task visible to `viewer`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::authorize`] for the `History` action, or
    /// [`TaskWorkflowError::Repository`] when the query fails.
    pub async fn history(
        &self,
        viewer: UserId,
        id: TaskId,
    ) -> TaskWorkflowResult<Vec<HistoryEntry>> {
        self.authorize(viewer, id, TaskAction::History).await?;
        Ok(self.repository.history(id).await?)
    }

    /// Lists the viewer's tasks for one folder and status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the query fails.
    pub async fn list(
        &self,
        viewer: UserId,
        relationship: Relationship,
        status: TaskStatus,
    ) -> TaskWorkflowResult<Vec<Task>> {
        Ok(self
            .repository
            .list_for_user(relationship, status, viewer)
            .await?)
    }
}
