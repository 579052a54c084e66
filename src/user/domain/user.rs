//! User aggregate root and related lifecycle types.

use super::{ParseUserStatusError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Admission status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// The user asked for access and awaits an admin decision.
    Requested,
    /// The user may use the assistant.
    Approved,
    /// The user was declined or banned.
    Banned,
}

impl UserStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Banned => "banned",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Approved => "Approved",
            Self::Banned => "Banned",
        }
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "requested" => Ok(Self::Requested),
            "approved" => Ok(Self::Approved),
            "banned" => Ok(Self::Banned),
            _ => Err(ParseUserStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Privilege level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular participant.
    Member,
    /// May moderate other users.
    Admin,
}

impl UserRole {
    /// Returns `true` for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Display name parts reported by the chat platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName {
    /// Given name.
    pub first_name: String,
    /// Family name, possibly empty.
    pub last_name: String,
}

impl DisplayName {
    /// Creates a display name from its parts.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.last_name.is_empty() {
            f.write_str(&self.first_name)
        } else {
            write!(f, "{} {}", self.first_name, self.last_name)
        }
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: DisplayName,
    role: UserRole,
    status: UserStatus,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
    comment: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Platform identity.
    pub id: UserId,
    /// Persisted display name.
    pub name: DisplayName,
    /// Persisted privilege level.
    pub role: UserRole,
    /// Persisted admission status.
    pub status: UserStatus,
    /// Identity that last changed the status.
    pub changed_by: UserId,
    /// Timestamp of the last status change.
    pub changed_at: DateTime<Utc>,
    /// Moderation comment.
    pub comment: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// A requested change of admission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatusChange {
    /// The user whose status changes.
    pub user_id: UserId,
    /// The new status.
    pub status: UserStatus,
    /// The identity performing the change.
    pub changed_by: UserId,
    /// When the change happened.
    pub changed_at: DateTime<Utc>,
}

impl User {
    /// Creates a user record for a self-registration request.
    #[must_use]
    pub fn request_access(id: UserId, name: DisplayName, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            name,
            role: UserRole::Member,
            status: UserStatus::Requested,
            changed_by: id,
            changed_at: timestamp,
            comment: String::new(),
            created_at: timestamp,
        }
    }

    /// Creates an approved administrator record.
    #[must_use]
    pub fn provision_admin(id: UserId, name: DisplayName, clock: &impl Clock) -> Self {
        Self {
            role: UserRole::Admin,
            status: UserStatus::Approved,
            ..Self::request_access(id, name, clock)
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            role: data.role,
            status: data.status,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
            comment: data.comment,
            created_at: data.created_at,
        }
    }

    /// Returns the platform identity.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Returns the privilege level.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns `true` when the user holds admin rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns the admission status.
    #[must_use]
    pub const fn status(&self) -> UserStatus {
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

    /// Returns the moderation comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a status change to this snapshot.
    pub fn apply(&mut self, change: &UserStatusChange) {
        self.status = change.status;
        self.changed_by = change.changed_by;
        self.changed_at = change.changed_at;
    }

    /// Grants admin rights and approves the account.
    pub fn promote_to_admin(&mut self, clock: &impl Clock) {
        self.role = UserRole::Admin;
        self.status = UserStatus::Approved;
        self.changed_by = self.id;
        self.changed_at = clock.utc();
    }
}
