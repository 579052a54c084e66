//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{HistoryRow, NewTaskRow, TaskRow},
    schema::{task_history, tasks},
};
use crate::storage::PgPool;
use crate::task::{
    domain::{
        HistoryEntry, PersistedTaskData, Relationship, Task, TaskComment, TaskDraft, TaskId,
        TaskStatus, TaskStatusChange,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed task repository.
///
/// History rows are appended by the `tasks_history_trigger` trigger.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(
        &self,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let new_row = NewTaskRow {
            owner_id: draft.owner().value(),
            assignee_id: draft.assignee().value(),
            status: TaskStatus::New.as_str().to_owned(),
            changed_by: draft.owner().value(),
            changed_at: created_at,
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            attachments: Vec::new(),
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update_status(&self, change: &TaskStatusChange) -> TaskRepositoryResult<()> {
        let TaskStatusChange {
            task_id,
            status,
            changed_by,
            changed_at,
        } = *change;
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.value())))
                .set((
                    tasks::status.eq(status.as_str()),
                    tasks::changed_by.eq(changed_by.value()),
                    tasks::changed_at.eq(changed_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn update_comment(
        &self,
        id: TaskId,
        comment: &TaskComment,
    ) -> TaskRepositoryResult<()> {
        let TaskComment {
            text,
            author,
            commented_at,
        } = comment.clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set((
                    tasks::comment.eq(Some(text)),
                    tasks::commented_by.eq(Some(author.value())),
                    tasks::commented_at.eq(Some(commented_at)),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_for_user(
        &self,
        relationship: Relationship,
        status: TaskStatus,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let by_status = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .into_boxed();
            let query = match relationship {
                Relationship::Inbox => by_status.filter(tasks::assignee_id.eq(user.value())),
                Relationship::Sent => by_status.filter(tasks::owner_id.eq(user.value())),
            };
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(id.value()))
                .order(task_history::id.asc())
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

fn user_id(raw: i64) -> TaskRepositoryResult<UserId> {
    UserId::new(raw).map_err(TaskRepositoryError::persistence)
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        assignee_id,
        status: persisted_status,
        changed_by,
        changed_at,
        title,
        description,
        comment,
        commented_by,
        commented_at,
        attachments,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let latest_comment = match (comment, commented_by, commented_at) {
        (Some(text), Some(author), Some(at)) => Some(TaskComment {
            text,
            author: user_id(author)?,
            commented_at: at,
        }),
        _ => None,
    };

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        owner: user_id(owner_id)?,
        assignee: user_id(assignee_id)?,
        status,
        changed_by: user_id(changed_by)?,
        changed_at,
        title,
        description,
        comment: latest_comment,
        attachments,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_history(row: HistoryRow) -> TaskRepositoryResult<HistoryEntry> {
    Ok(HistoryEntry {
        task_id: TaskId::new(row.task_id).map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(row.status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        changed_by: user_id(row.changed_by)?,
        changed_at: row.changed_at,
        comment: row.comment,
    })
}
