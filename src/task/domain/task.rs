//! Task aggregate root and related lifecycle types.

use super::{Relationship, TaskDomainError, TaskId, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest comment left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    /// Comment text.
    pub text: String,
    /// Commenter identity.
    pub author: UserId,
    /// When the comment was left.
    pub commented_at: DateTime<Utc>,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    owner: UserId,
    assignee: UserId,
    title: String,
    description: String,
}

impl TaskDraft {
    /// Creates a draft.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        owner: UserId,
        assignee: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let trimmed_title = title.into().trim().to_owned();
        if trimmed_title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            owner,
            assignee,
            title: trimmed_title,
            description: description.into(),
        })
    }

    /// Returns the creator.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    assignee: UserId,
    status: TaskStatus,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
    title: String,
    description: String,
    comment: Option<TaskComment>,
    attachments: Vec<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Task number.
    pub id: TaskId,
    /// Creator.
    pub owner: UserId,
    /// Assignee.
    pub assignee: UserId,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Identity that last changed the status.
    pub changed_by: UserId,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Latest comment.
    pub comment: Option<TaskComment>,
    /// Attachment references.
    pub attachments: Vec<String>,
}

/// A validated change of task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStatusChange {
    /// The task being changed.
    pub task_id: TaskId,
    /// The new status.
    pub status: TaskStatus,
    /// The identity performing the change.
    pub changed_by: UserId,
    /// When the change happened.
    pub changed_at: DateTime<Utc>,
}

/// Immutable audit record appended on creation, status change, or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The task the entry belongs to.
    pub task_id: TaskId,
    /// Status at the time of the entry.
    pub status: TaskStatus,
    /// Actor.
    pub changed_by: UserId,
    /// Timestamp.
    pub changed_at: DateTime<Utc>,
    /// Comment text for comment entries.
    pub comment: Option<String>,
}

impl Task {
    /// Materializes a freshly stored draft with status `New`.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner: draft.owner,
            assignee: draft.assignee,
            status: TaskStatus::New,
            changed_by: draft.owner,
            changed_at: created_at,
            title: draft.title,
            description: draft.description,
            comment: None,
            attachments: Vec::new(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            assignee: data.assignee,
            status: data.status,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
            title: data.title,
            description: data.description,
            comment: data.comment,
            attachments: data.attachments,
        }
    }

    /// Returns the task number.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> UserId {
        self.assignee
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the identity that last changed the status.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns the timestamp of the last status change.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the latest comment.
    #[must_use]
    pub const fn comment(&self) -> Option<&TaskComment> {
        self.comment.as_ref()
    }

    /// Returns attachment references.
    #[must_use]
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns how `viewer` relates to this task.
    ///
    /// The assignee check runs first, so a task assigned to its own creator
    /// lands in the creator's inbox.
    #[must_use]
    pub fn relationship_to(&self, viewer: UserId) -> Option<Relationship> {
        if self.assignee == viewer {
            Some(Relationship::Inbox)
        } else if self.owner == viewer {
            Some(Relationship::Sent)
        } else {
            None
        }
    }

    /// Applies a status change to this snapshot.
    pub fn apply_status(&mut self, change: &TaskStatusChange) {
        self.status = change.status;
        self.changed_by = change.changed_by;
        self.changed_at = change.changed_at;
    }

    /// Replaces the latest comment.
    pub fn apply_comment(&mut self, comment: TaskComment) {
        self.comment = Some(comment);
    }
}
