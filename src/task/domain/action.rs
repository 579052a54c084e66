//! Actions a viewer can take on a task.

use super::{ParseTaskActionError, TaskStatus};
use std::fmt;

/// Action offered on a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Begin work.
    Start,
    /// Report the work done.
    Complete,
    /// Send completed work back to the assignee.
    Reject,
    /// Accept the work and finish the task.
    Close,
    /// Replace the latest comment.
    Comment,
    /// Show the audit history.
    History,
}

impl TaskAction {
    /// Returns the button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Complete => "Complete",
            Self::Reject => "Reject",
            Self::Close => "Close",
            Self::Comment => "Comment",
            Self::History => "History",
        }
    }

    /// Returns the status this action produces, or `None` for side actions.
    #[must_use]
    pub const fn target_status(self) -> Option<TaskStatus> {
        match self {
            Self::Start => Some(TaskStatus::Started),
            Self::Complete => Some(TaskStatus::Completed),
            Self::Reject => Some(TaskStatus::Rejected),
            Self::Close => Some(TaskStatus::Closed),
            Self::Comment | Self::History => None,
        }
    }
}

impl TryFrom<&str> for TaskAction {
    type Error = ParseTaskActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "start" => Ok(Self::Start),
            "complete" => Ok(Self::Complete),
            "reject" => Ok(Self::Reject),
            "close" => Ok(Self::Close),
            "comment" => Ok(Self::Comment),
            "history" => Ok(Self::History),
            _ => Err(ParseTaskActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
