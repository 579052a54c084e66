//! Diesel row models for task persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task number.
    pub id: i64,
    /// Creator identity.
    pub owner_id: i64,
    /// Assignee identity.
    pub assignee_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Identity that last changed the status.
    pub changed_by: i64,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Latest comment.
    pub comment: Option<String>,
    /// Latest commenter.
    pub commented_by: Option<i64>,
    /// Latest comment timestamp.
    pub commented_at: Option<DateTime<Utc>>,
    /// Attachment references.
    pub attachments: Vec<String>,
}

/// Insert model for task records. The number comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Creator identity.
    pub owner_id: i64,
    /// Assignee identity.
    pub assignee_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Identity that last changed the status.
    pub changed_by: i64,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Attachment references.
    pub attachments: Vec<String>,
}

/// Query result row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Task number.
    pub task_id: i64,
    /// Status at the time of the entry.
    pub status: String,
    /// Actor.
    pub changed_by: i64,
    /// Timestamp.
    pub changed_at: DateTime<Utc>,
    /// Comment text for comment entries.
    pub comment: Option<String>,
}
