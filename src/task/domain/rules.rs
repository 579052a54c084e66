//! Workflow rule table.
//!
//! Only the viewer's relationship to a task matters here. Admin rights never
//! widen the set of allowed actions.

use super::{Relationship, TaskAction, TaskStatus};

use super::TaskAction::{Close, Comment, Complete, History, Reject, Start};

/// Returns the ordered actions available for `relationship` on a task in
/// `status`.
#[must_use]
pub const fn allowed_actions(
    relationship: Relationship,
    status: TaskStatus,
) -> &'static [TaskAction] {
    match (relationship, status) {
        (Relationship::Inbox, TaskStatus::New) => &[Start, Comment, Complete, History],
        (Relationship::Inbox, TaskStatus::Started | TaskStatus::Rejected) => {
            &[Complete, Comment, History]
        }
        (Relationship::Inbox | Relationship::Sent, TaskStatus::Closed)
        | (Relationship::Inbox, TaskStatus::Completed) => &[History],
        (Relationship::Sent, TaskStatus::New | TaskStatus::Started | TaskStatus::Rejected) => {
            &[Close, Comment, History]
        }
        (Relationship::Sent, TaskStatus::Completed) => &[Reject, Comment, Close, History],
    }
}

/// Returns `true` when `action` is in the allowed set.
#[must_use]
pub fn is_allowed(relationship: Relationship, status: TaskStatus, action: TaskAction) -> bool {
    allowed_actions(relationship, status).contains(&action)
}
