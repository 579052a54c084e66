//! `PostgreSQL` repository implementation for user storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::storage::PgPool;
use crate::user::{
    domain::{
        DisplayName, PersistedUserData, User, UserId, UserRole, UserStatus, UserStatusChange,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
///
/// Status history is appended by the `users_history_trigger` trigger.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let new_row = to_new_row(user);
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(user_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let row = to_new_row(user);
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.value())))
                .set(&row)
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn update_status(&self, change: &UserStatusChange) -> UserRepositoryResult<()> {
        let UserStatusChange {
            user_id,
            status,
            changed_by,
            changed_at,
        } = *change;
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.value())))
                .set((
                    users::status.eq(status.as_str()),
                    users::changed_by.eq(changed_by.value()),
                    users::changed_at.eq(changed_at),
                ))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_by_status(&self, statuses: &[UserStatus]) -> UserRepositoryResult<Vec<User>> {
        let wanted: Vec<String> = statuses
            .iter()
            .map(|status| status.as_str().to_owned())
            .collect();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::status.eq_any(wanted))
                .order((users::created_at.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn list_admins(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::is_admin.eq(true))
                .order((users::created_at.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().value(),
        first_name: user.name().first_name.clone(),
        last_name: user.name().last_name.clone(),
        is_admin: user.is_admin(),
        status: user.status().as_str().to_owned(),
        changed_by: user.changed_by().value(),
        changed_at: user.changed_at(),
        comment: user.comment().to_owned(),
        created_at: user.created_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        first_name,
        last_name,
        is_admin,
        status: persisted_status,
        changed_by,
        changed_at,
        comment,
        created_at,
    } = row;

    let status =
        UserStatus::try_from(persisted_status.as_str()).map_err(UserRepositoryError::persistence)?;
    let data = PersistedUserData {
        id: UserId::new(id).map_err(UserRepositoryError::persistence)?,
        name: DisplayName::new(first_name, last_name),
        role: if is_admin {
            UserRole::Admin
        } else {
            UserRole::Member
        },
        status,
        changed_by: UserId::new(changed_by).map_err(UserRepositoryError::persistence)?,
        changed_at,
        comment,
        created_at,
    };
    Ok(User::from_persisted(data))
}
