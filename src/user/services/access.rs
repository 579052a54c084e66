//! Service layer for registration requests, moderation, and listings.

use crate::user::{
    domain::{
        AccessDecision, DisplayName, ModerationKind, User, UserId, UserListing, UserStatus,
        UserStatusChange,
    },
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for access and moderation operations.
#[derive(Debug, Error)]
pub enum AccessServiceError {
    /// The acting user lacks admin rights.
    #[error("user {0} is not an admin")]
    NotAdmin(UserId),
    /// The target user does not exist.
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for access service operations.
pub type AccessServiceResult<T> = Result<T, AccessServiceError>;

/// Outcome of a self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequestOutcome {
    /// A new `Requested` record was stored.
    Created(User),
    /// The identity already has a record; nothing was written.
    AlreadyRequested(User),
}

/// Outcome of an admin answering a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The request was still pending and the decision was applied.
    Applied(User),
    /// Another admin decided first; the record is returned unchanged.
    AlreadyDecided(User),
}

/// Result of a moderation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationOutcome {
    /// The user after the change.
    pub user: User,
    /// The status before the change.
    pub previous_status: UserStatus,
}

/// Admission and moderation orchestration service.
#[derive(Clone)]
pub struct AccessService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AccessService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new access service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Records a self-registration request for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when persistence fails.
    pub async fn request_access(
        &self,
        id: UserId,
        name: DisplayName,
    ) -> AccessServiceResult<AccessRequestOutcome> {
        if let Some(existing) = self.repository.find_by_id(id).await? {
            return Ok(AccessRequestOutcome::AlreadyRequested(existing));
        }
        let user = User::request_access(id, name, &*self.clock);
        self.repository.store(&user).await?;
        info!(identity = %id, "access requested");
        Ok(AccessRequestOutcome::Created(user))
    }

    /// Applies an admin's answer to a pending registration request.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::NotAdmin`] when `admin` lacks admin
    /// rights, [`AccessServiceError::UnknownUser`] when `target` is not
    /// registered, or [`AccessServiceError::Repository`] on persistence
    /// failure.
    pub async fn decide_request(
        &self,
        admin: &User,
        target: UserId,
        decision: AccessDecision,
    ) -> AccessServiceResult<DecisionOutcome> {
        ensure_admin(admin)?;
        let mut user = self.load(target).await?;
        if user.status() != UserStatus::Requested {
            return Ok(DecisionOutcome::AlreadyDecided(user));
        }
        let change = self.change(target, decision.target_status(), admin.id());
        self.repository.update_status(&change).await?;
        user.apply(&change);
        info!(identity = %target, admin = %admin.id(), status = %change.status, "request decided");
        Ok(DecisionOutcome::Applied(user))
    }

    /// Applies a moderation action from the Users→Edit sliders.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::NotAdmin`] when `moderator` lacks admin
    /// rights, [`AccessServiceError::UnknownUser`] when `target` is not
    /// registered, or [`AccessServiceError::Repository`] on persistence
    /// failure.
    pub async fn moderate(
        &self,
        moderator: &User,
        target: UserId,
        kind: ModerationKind,
    ) -> AccessServiceResult<ModerationOutcome> {
        ensure_admin(moderator)?;
        let mut user = self.load(target).await?;
        let previous_status = user.status();
        let change = self.change(target, kind.target_status(), moderator.id());
        self.repository.update_status(&change).await?;
        user.apply(&change);
        info!(
            identity = %target,
            admin = %moderator.id(),
            action = kind.label(),
            "user moderated"
        );
        Ok(ModerationOutcome {
            user,
            previous_status,
        })
    }

    /// Returns the users a moderator may act on for `kind`, excluding the
    /// moderator.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when the query fails.
    pub async fn moderation_queue(
        &self,
        kind: ModerationKind,
        moderator: UserId,
    ) -> AccessServiceResult<Vec<User>> {
        let mut users = self
            .repository
            .list_by_status(kind.source_statuses())
            .await?;
        users.retain(|user| user.id() != moderator);
        Ok(users)
    }

    /// Returns the users shown by a Users→View listing.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when the query fails.
    pub async fn list(&self, listing: UserListing) -> AccessServiceResult<Vec<User>> {
        Ok(self.repository.list_by_status(&[listing.status()]).await?)
    }

    /// Returns every admin, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when the query fails.
    pub async fn admins(&self) -> AccessServiceResult<Vec<User>> {
        Ok(self.repository.list_admins().await?)
    }

    /// Returns approved users, the candidates for task assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when the query fails.
    pub async fn assignable_users(&self) -> AccessServiceResult<Vec<User>> {
        Ok(self
            .repository
            .list_by_status(&[UserStatus::Approved])
            .await?)
    }

    /// Creates or promotes the bootstrap admin.
    ///
    /// # Errors
    ///
    /// Returns [`AccessServiceError::Repository`] when persistence fails.
    pub async fn provision_admin(&self, id: UserId, name: DisplayName) -> AccessServiceResult<User> {
        match self.repository.find_by_id(id).await? {
            Some(existing) if existing.is_admin() && existing.status() == UserStatus::Approved => {
                Ok(existing)
            }
            Some(mut existing) => {
                existing.promote_to_admin(&*self.clock);
                self.repository.update(&existing).await?;
                info!(identity = %id, "existing user promoted to admin");
                Ok(existing)
            }
            None => {
                let admin = User::provision_admin(id, name, &*self.clock);
                self.repository.store(&admin).await?;
                info!(identity = %id, "admin provisioned");
                Ok(admin)
            }
        }
    }

    async fn load(&self, id: UserId) -> AccessServiceResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccessServiceError::UnknownUser(id))
    }

    fn change(&self, user_id: UserId, status: UserStatus, actor: UserId) -> UserStatusChange {
        UserStatusChange {
            user_id,
            status,
            changed_by: actor,
            changed_at: self.clock.utc(),
        }
    }
}

fn ensure_admin(user: &User) -> AccessServiceResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AccessServiceError::NotAdmin(user.id()))
    }
}
