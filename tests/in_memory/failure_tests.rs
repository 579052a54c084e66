//! Persistence failures leave the session where it was.

use crate::in_memory::helpers::{harness_with, keyboard_labels};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use rstest::rstest;
use std::sync::Arc;
use tasker::session::{MenuNode, WizardState};
use tasker::task::domain::{
    HistoryEntry, PersistedTaskData, Relationship, Task, TaskComment, TaskDraft, TaskId,
    TaskStatus, TaskStatusChange,
};
use tasker::task::ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
use tasker::user::domain::UserId;

mock! {
    pub Tasks {}

    #[async_trait]
    impl TaskRepository for Tasks {
        async fn create(
            &self,
            draft: &TaskDraft,
            created_at: DateTime<Utc>,
        ) -> TaskRepositoryResult<Task>;
        async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
        async fn update_status(&self, change: &TaskStatusChange) -> TaskRepositoryResult<()>;
        async fn update_comment(
            &self,
            id: TaskId,
            comment: &TaskComment,
        ) -> TaskRepositoryResult<()>;
        async fn list_for_user(
            &self,
            relationship: Relationship,
            status: TaskStatus,
            user: UserId,
        ) -> TaskRepositoryResult<Vec<Task>>;
        async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<HistoryEntry>>;
    }
}

fn unavailable() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("database unavailable"))
}

fn stored_task(owner: UserId, assignee: UserId) -> eyre::Result<Task> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(1)?,
        owner,
        assignee,
        status: TaskStatus::New,
        changed_by: owner,
        changed_at: Utc::now(),
        title: "Fix roof".to_owned(),
        description: "before winter".to_owned(),
        comment: None,
        attachments: Vec::new(),
    }))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_folder_query_keeps_the_folder() -> eyre::Result<()> {
    let mut tasks = MockTasks::new();
    tasks
        .expect_list_for_user()
        .times(1)
        .returning(|_, _, _| Err(unavailable()));
    let h = harness_with(Arc::new(tasks)).await?;
    let member = h.member(1, "Olga").await?;

    h.texts(member, &["Inbox", "New"]).await;

    let notice = h.last(member)?;
    assert_eq!(notice.text, "Something went wrong while selecting tasks :(");
    assert!(keyboard_labels(&notice).is_empty());
    let session = h.session(member).await;
    assert_eq!(session.node(), MenuNode::Folder(Relationship::Inbox));
    assert!(session.slider().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_save_keeps_the_wizard_on_confirm() -> eyre::Result<()> {
    let mut tasks = MockTasks::new();
    tasks
        .expect_create()
        .times(1)
        .returning(|_, _| Err(unavailable()));
    let h = harness_with(Arc::new(tasks)).await?;
    let owner = h.member(1, "Olga").await?;
    let bob = h.member(2, "Bob").await?;

    h.texts(owner, &["New", "3 | Bob Tester", "T", "D", "Save"])
        .await;

    assert_eq!(
        h.last(owner)?.text,
        "Something went wrong while saving task :("
    );
    let session = h.session(owner).await;
    assert_eq!(session.node(), MenuNode::NewTask);
    assert!(matches!(
        session.wizard(),
        WizardState::Confirming { title, description, .. } if title == "T" && description == "D"
    ));
    assert!(h.texts_for(bob).is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_status_write_is_reported() -> eyre::Result<()> {
    let owner = UserId::new(1)?;
    let assignee = UserId::new(2)?;
    let task = stored_task(owner, assignee)?;
    let mut tasks = MockTasks::new();
    tasks
        .expect_find_by_id()
        .returning(move |_| Ok(Some(task.clone())));
    tasks
        .expect_update_status()
        .times(1)
        .returning(|_| Err(unavailable()));
    let h = harness_with(Arc::new(tasks)).await?;
    h.member(1, "Olga").await?;
    h.member(2, "Ivan").await?;

    h.press(assignee, "Start|1", None).await;

    assert_eq!(
        h.last(assignee)?.text,
        "Something went wrong while updating task status :("
    );
    assert!(!h.saw(assignee, "Status has been changed"));
    assert_eq!(h.node(assignee).await, MenuNode::Main);
    Ok(())
}
