//! Repository port for user persistence and identity resolution.

use crate::user::domain::{User, UserId, UserStatus, UserStatusChange};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUser`] when the identity is
    /// already registered.
    async fn store(&self, user: &User) -> UserRepositoryResult<()>;

    /// Replaces role, status, and name of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Changes the admission status of a user and records the actor.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn update_status(&self, change: &UserStatusChange) -> UserRepositoryResult<()>;

    /// Finds a user by platform identity.
    ///
    /// Returns `None` for identities seen for the first time.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Lists users whose status is any of `statuses`, in registration order.
    async fn list_by_status(&self, statuses: &[UserStatus]) -> UserRepositoryResult<Vec<User>>;

    /// Lists every admin, in registration order.
    async fn list_admins(&self) -> UserRepositoryResult<Vec<User>>;
}

/// Outcome of resolving a platform identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The identity belongs to a persisted user.
    Known(User),
    /// The identity has never registered.
    Unknown,
}

impl Identity {
    /// Returns the resolved user, if any.
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        match self {
            Self::Known(user) => Some(user),
            Self::Unknown => None,
        }
    }
}

/// Maps a transport-level identity to a persisted user record.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves `id` to a user, or [`Identity::Unknown`] on first contact.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError`] when the lookup itself fails.
    async fn resolve(&self, id: UserId) -> UserRepositoryResult<Identity>;
}

#[async_trait]
impl<R> IdentityResolver for R
where
    R: UserRepository,
{
    async fn resolve(&self, id: UserId) -> UserRepositoryResult<Identity> {
        Ok(self
            .find_by_id(id)
            .await?
            .map_or(Identity::Unknown, Identity::Known))
    }
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same identity already exists.
    #[error("duplicate user identity: {0}")]
    DuplicateUser(UserId),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
