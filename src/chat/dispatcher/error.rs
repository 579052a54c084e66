//! Errors raised while handling one inbound event.

use crate::chat::ports::RenderError;
use crate::task::services::TaskWorkflowError;
use crate::user::services::AccessServiceError;
use thiserror::Error;

/// Result type for dispatcher handlers.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Failure of a handler, tagged with what the handler was doing.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A user or moderation operation failed.
    #[error("something went wrong while {activity}")]
    Access {
        /// What the handler was doing.
        activity: &'static str,
        /// Underlying failure.
        #[source]
        source: AccessServiceError,
    },
    /// A task operation failed.
    #[error("something went wrong while {activity}")]
    Workflow {
        /// What the handler was doing.
        activity: &'static str,
        /// Underlying failure.
        #[source]
        source: TaskWorkflowError,
    },
    /// A reply could not be rendered or delivered.
    #[error("failed to render a reply")]
    Render(#[from] RenderError),
}

impl DispatchError {
    /// Tags a user-service failure.
    #[must_use]
    pub const fn access(activity: &'static str, source: AccessServiceError) -> Self {
        Self::Access { activity, source }
    }

    /// Tags a task-service failure.
    #[must_use]
    pub const fn workflow(activity: &'static str, source: TaskWorkflowError) -> Self {
        Self::Workflow { activity, source }
    }

    /// Returns the notice shown to the user who triggered the failure.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Workflow {
                source:
                    err @ (TaskWorkflowError::NotFound(_)
                    | TaskWorkflowError::AccessDenied { .. }
                    | TaskWorkflowError::Domain(_)),
                ..
            } => err.to_string(),
            Self::Workflow {
                source: TaskWorkflowError::ActionNotAllowed { action, view },
                ..
            } => format!(
                "It isn't allowed to {} Task #{}",
                action.label().to_lowercase(),
                view.task.id()
            ),
            Self::Access { activity, .. } | Self::Workflow { activity, .. } => {
                format!("Something went wrong while {activity} :(")
            }
            Self::Render(_) => "Something went wrong while rendering the reply :(".to_owned(),
        }
    }
}

/// Attaches an activity to a service result.
pub(crate) trait During<T> {
    /// Converts the error into a [`DispatchError`] tagged with `activity`.
    fn during(self, activity: &'static str) -> DispatchResult<T>;
}

impl<T> During<T> for Result<T, AccessServiceError> {
    fn during(self, activity: &'static str) -> DispatchResult<T> {
        self.map_err(|source| DispatchError::access(activity, source))
    }
}

impl<T> During<T> for Result<T, TaskWorkflowError> {
    fn during(self, activity: &'static str) -> DispatchResult<T> {
        self.map_err(|source| DispatchError::workflow(activity, source))
    }
}
