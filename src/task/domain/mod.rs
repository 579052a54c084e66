//! Domain model for tasks and their workflow.
//!
//! A task moves `New → Started → Completed → Closed`, with `Rejected`
//! sending completed work back to the assignee. Which move a viewer may make
//! is decided by [`rules::allowed_actions`] from the viewer's
//! [`Relationship`] to the task and its current [`TaskStatus`].

mod action;
mod error;
mod ids;
mod relationship;
pub mod rules;
mod status;
mod task;

pub use action::TaskAction;
pub use error::{ParseTaskActionError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use relationship::Relationship;
pub use status::TaskStatus;
pub use task::{
    HistoryEntry, PersistedTaskData, Task, TaskComment, TaskDraft, TaskStatusChange,
};
