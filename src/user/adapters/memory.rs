//! In-memory repository for users.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{User, UserId, UserStatus, UserStatusChange},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
///
/// Status changes are mirrored into an append-only history, standing in for
/// the audit trigger of the `PostgreSQL` schema.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    registration_order: Vec<UserId>,
    history: Vec<UserStatusChange>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded status change in order.
    ///
    /// Returns an empty list if the internal lock is poisoned.
    #[must_use]
    pub fn status_history(&self) -> Vec<UserStatusChange> {
        self.state
            .read()
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn collect_ordered<F>(state: &InMemoryUserState, predicate: F) -> Vec<User>
where
    F: Fn(&User) -> bool,
{
    state
        .registration_order
        .iter()
        .filter_map(|id| state.users.get(id))
        .filter(|user| predicate(user))
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        state.registration_order.push(user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let previous_status = state
            .users
            .get(&user.id())
            .map(User::status)
            .ok_or(UserRepositoryError::NotFound(user.id()))?;
        if previous_status != user.status() {
            state.history.push(UserStatusChange {
                user_id: user.id(),
                status: user.status(),
                changed_by: user.changed_by(),
                changed_at: user.changed_at(),
            });
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update_status(&self, change: &UserStatusChange) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let user = state
            .users
            .get_mut(&change.user_id)
            .ok_or(UserRepositoryError::NotFound(change.user_id))?;
        let status_changed = user.status() != change.status;
        user.apply(change);
        if status_changed {
            state.history.push(*change);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list_by_status(&self, statuses: &[UserStatus]) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(collect_ordered(&state, |user| statuses.contains(&user.status())))
    }

    async fn list_admins(&self) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(collect_ordered(&state, User::is_admin))
    }
}
