//! Shared `PostgreSQL` pool construction and schema bootstrap.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use thiserror::Error;

/// `PostgreSQL` connection pool shared by the user and task adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating tables, indexes, and history triggers.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_tasker_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("database connection failed: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The schema SQL failed to apply.
    #[error("schema bootstrap failed: {0}")]
    Schema(Arc<dyn std::error::Error + Send + Sync>),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`StorageError::Connection`] when the pool cannot establish its
/// initial connections.
pub fn connect_pool(database_url: &str, pool_size: u32) -> Result<PgPool, StorageError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|err| StorageError::Connection(Arc::new(err)))
}

/// Applies the tasker schema. Every statement is idempotent.
///
/// # Errors
///
/// Returns [`StorageError`] when no connection is available or the SQL
/// fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StorageError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|err| StorageError::Connection(Arc::new(err)))?;
        connection
            .batch_execute(CREATE_SCHEMA_SQL)
            .map_err(|err| StorageError::Schema(Arc::new(err)))
    })
    .await
    .map_err(|err| StorageError::Schema(Arc::new(err)))?
}
