//! Moderation vocabulary shared by the access service and the session menus.

use super::UserStatus;

/// Moderation action an admin performs from the Users→Edit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationKind {
    /// Approve pending requests.
    Approve,
    /// Ban pending or approved users.
    Ban,
    /// Restore banned users.
    Unban,
}

impl ModerationKind {
    /// Returns the statuses a user must have to appear in this queue.
    #[must_use]
    pub const fn source_statuses(self) -> &'static [UserStatus] {
        match self {
            Self::Approve => &[UserStatus::Requested],
            Self::Ban => &[UserStatus::Requested, UserStatus::Approved],
            Self::Unban => &[UserStatus::Banned],
        }
    }

    /// Returns the status the moderated user ends up with.
    #[must_use]
    pub const fn target_status(self) -> UserStatus {
        match self {
            Self::Approve | Self::Unban => UserStatus::Approved,
            Self::Ban => UserStatus::Banned,
        }
    }

    /// Returns the button label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Ban => "Ban",
            Self::Unban => "Unban",
        }
    }
}

/// Read-only listing offered under Users→View.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserListing {
    /// Approved users.
    All,
    /// Pending requests.
    Requests,
    /// Banned users.
    Banned,
}

impl UserListing {
    /// Returns the status listed by this filter.
    #[must_use]
    pub const fn status(self) -> UserStatus {
        match self {
            Self::All => UserStatus::Approved,
            Self::Requests => UserStatus::Requested,
            Self::Banned => UserStatus::Banned,
        }
    }
}

/// An admin's answer to a registration request notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Admit the requester.
    Accept,
    /// Decline the request.
    Decline,
}

impl AccessDecision {
    /// Returns the status the requester ends up with.
    #[must_use]
    pub const fn target_status(self) -> UserStatus {
        match self {
            Self::Accept => UserStatus::Approved,
            Self::Decline => UserStatus::Banned,
        }
    }
}
