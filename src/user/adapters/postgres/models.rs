//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Chat-platform identity.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Admin flag.
    pub is_admin: bool,
    /// Admission status.
    pub status: String,
    /// Identity that last changed the status.
    pub changed_by: i64,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Moderation comment.
    pub comment: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert and full-update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Chat-platform identity.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Admin flag.
    pub is_admin: bool,
    /// Admission status.
    pub status: String,
    /// Identity that last changed the status.
    pub changed_by: i64,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Moderation comment.
    pub comment: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
