//! End-to-end conversations through the dispatcher.

use crate::in_memory::helpers::{action_labels, harness, keyboard_labels};
use rstest::rstest;
use tasker::session::MenuNode;
use tasker::task::domain::{Relationship, TaskStatus};
use tasker::task::ports::TaskRepository;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_are_kept_out_of_user_management() -> eyre::Result<()> {
    let h = harness().await?;
    let member = h.member(1, "Bob").await?;

    h.text(member, "Users").await;

    assert_eq!(h.node(member).await, MenuNode::Main);
    let menu = h.last(member)?;
    assert!(!keyboard_labels(&menu).iter().any(|label| label == "Users"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admins_reach_user_management() -> eyre::Result<()> {
    let h = harness().await?;
    let admin = h.admin.id();

    h.texts(admin, &["Users", "Edit"]).await;

    assert_eq!(h.node(admin).await, MenuNode::UsersEdit);
    assert_eq!(
        keyboard_labels(&h.last(admin)?),
        vec!["Approve", "Ban", "Unban", "Back"]
    );
    h.text(admin, "Back").await;
    assert_eq!(h.node(admin).await, MenuNode::Users);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_text_falls_back_to_main() -> eyre::Result<()> {
    let h = harness().await?;
    let member = h.member(1, "Bob").await?;
    h.text(member, "Inbox").await;

    h.text(member, "What now?").await;

    assert_eq!(h.node(member).await, MenuNode::Main);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_completes_a_new_task() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    let task = h.task(owner, assignee, "Fix roof").await?;

    h.press(assignee, &format!("Complete|{}", task.id()), None)
        .await;

    assert_eq!(h.stored(task.id()).await?.status(), TaskStatus::Completed);
    assert_eq!(h.tasks.history(task.id()).await?.len(), 2);
    assert!(h.saw(assignee, "Status has been changed to Completed for Task 1"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_cannot_restart_completed_task() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    let task = h.task(owner, assignee, "Fix roof").await?;
    h.press(assignee, "Complete|1", None).await;
    h.command(owner, "/task 1").await;
    let card = h.last_ref(owner)?;

    h.press(owner, "Start|1", Some(card)).await;

    assert_eq!(h.stored(task.id()).await?.status(), TaskStatus::Completed);
    assert!(h.saw(
        owner,
        "It isn't allowed to change the status to Started for Task #1"
    ));
    let rerendered = h
        .gateway
        .message(card)
        .ok_or_else(|| eyre::eyre!("card missing"))?;
    assert_eq!(
        action_labels(&rerendered),
        vec!["Reject", "Comment", "Close", "History"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_edits_card_in_place() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    h.task(owner, assignee, "Fix roof").await?;
    h.command(assignee, "/task 1").await;
    let card = h.last_ref(assignee)?;
    assert_eq!(
        action_labels(&h.last(assignee)?),
        vec!["Start", "Comment", "Complete", "History"]
    );

    h.press(assignee, "Start|1", Some(card)).await;

    let edited = h
        .gateway
        .message(card)
        .ok_or_else(|| eyre::eyre!("card missing"))?;
    assert!(edited.text.contains("Status: Started"));
    assert_eq!(action_labels(&edited), vec!["Complete", "Comment", "History"]);
    assert_eq!(h.session(assignee).await.last_rendered(), Some(card));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wizard_creates_exactly_one_task() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let bob = h.member(2, "Bob").await?;

    h.text(owner, "New").await;
    assert_eq!(h.node(owner).await, MenuNode::NewTask);
    assert!(keyboard_labels(&h.last(owner)?).contains(&"3 | Bob Tester".to_owned()));

    h.texts(owner, &["3 | Bob Tester", "T", "D", "Save"]).await;

    let sent = h
        .tasks
        .list_for_user(Relationship::Sent, TaskStatus::New, owner)
        .await?;
    assert_eq!(sent.len(), 1);
    let task = sent.first().ok_or_else(|| eyre::eyre!("task missing"))?;
    assert_eq!(task.owner(), owner);
    assert_eq!(task.assignee(), bob);
    assert_eq!(task.title(), "T");
    assert_eq!(task.description(), "D");

    let session = h.session(owner).await;
    assert_eq!(session.node(), MenuNode::Main);
    assert!(!session.wizard().is_active());
    assert!(h.saw(owner, "Task #1 has been created"));
    assert!(h.saw(bob, "You have a new task"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn self_assigned_tasks_skip_the_notification() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;

    h.texts(owner, &["New", "Olga Tester", "Note", "to self", "Save"])
        .await;

    assert!(h.saw(owner, "Task #1 has been created"));
    assert!(!h.saw(owner, "You have a new task"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wizard_back_and_cancel() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;

    h.texts(owner, &["New", "1", "Back"]).await;
    assert!(h.last(owner)?.text.starts_with("Select user"));
    assert_eq!(h.node(owner).await, MenuNode::NewTask);

    h.text(owner, "Cancel").await;

    let session = h.session(owner).await;
    assert_eq!(session.node(), MenuNode::Main);
    assert!(!session.wizard().is_active());
    assert!(h.saw(owner, "Task creation cancelled"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confirm_step_ignores_other_input() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;

    h.texts(owner, &["New", "1", "T", "D", "Maybe"]).await;

    assert_eq!(h.node(owner).await, MenuNode::NewTask);
    assert!(h.session(owner).await.wizard().is_active());
    assert!(h.last(owner)?.text.ends_with("Save the task?"));
    Ok(())
}

#[rstest]
#[case("/task", "you should input task number after /task command")]
#[case("/history", "you should input task number after /history command")]
#[case("/task abc", "abc - wrong argument type")]
#[case("/task 99", "Can't find any task with ID 99")]
#[tokio::test(flavor = "multi_thread")]
async fn task_command_arguments(#[case] line: &str, #[case] reply: &str) -> eyre::Result<()> {
    let h = harness().await?;
    let member = h.member(1, "Olga").await?;

    h.command(member, line).await;

    assert_eq!(h.last(member)?.text, reply);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn strangers_cannot_open_foreign_tasks() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    let stranger = h.member(3, "Sam").await?;
    h.task(owner, assignee, "Private").await?;

    h.command(stranger, "/task 1").await;
    h.press(stranger, "Start|1", None).await;

    assert!(h.saw(stranger, "Access denied for task #1"));
    assert_eq!(h.stored(tasker::task::domain::TaskId::new(1)?).await?.status(), TaskStatus::New);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_command_lists_entries_and_returns_to_main() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    h.task(owner, assignee, "Fix roof").await?;
    h.press(assignee, "Start|1", None).await;
    h.text(owner, "Sent").await;

    h.command(owner, "/history 1").await;

    let history = h.last(owner)?;
    let lines: Vec<&str> = history.text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines.first().copied(), Some("Task #1"));
    assert_eq!(lines.get(1).copied(), Some("Title: Fix roof"));
    assert!(lines.get(2).is_some_and(|line| line.starts_with("1. New by Olga Tester at ")));
    assert!(lines.get(3).is_some_and(|line| line.starts_with("2. Started by Ivan Tester at ")));
    assert_eq!(h.node(owner).await, MenuNode::Main);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn folder_slider_pages_through_tasks() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    h.task(owner, assignee, "First").await?;
    h.task(owner, assignee, "Second").await?;

    h.texts(assignee, &["Inbox", "New"]).await;
    assert_eq!(
        h.node(assignee).await,
        MenuNode::FolderList(Relationship::Inbox, TaskStatus::New)
    );
    assert!(h.saw(assignee, "Inbox: 2 new task(s)"));
    assert!(h.last(assignee)?.text.starts_with("Task #1"));

    h.text(assignee, "Next").await;
    assert!(h.last(assignee)?.text.starts_with("Task #2"));
    assert_eq!(
        h.session(assignee).await.focused_task().map(|id| id.value()),
        Some(2)
    );

    h.text(assignee, "Next").await;
    assert!(h.saw(assignee, "No more new tasks. It was last one"));
    let session = h.session(assignee).await;
    assert_eq!(session.node(), MenuNode::Folder(Relationship::Inbox));
    assert!(session.slider().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retreating_from_first_task_closes_slider() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    h.task(owner, assignee, "Only").await?;

    h.texts(owner, &["Sent", "New", "Previous"]).await;

    assert!(h.saw(owner, "No more new tasks. It was first one"));
    assert_eq!(h.node(owner).await, MenuNode::Folder(Relationship::Sent));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_folder_reports_nothing_to_show() -> eyre::Result<()> {
    let h = harness().await?;
    let member = h.member(1, "Olga").await?;

    h.texts(member, &["Inbox", "Started"]).await;

    assert!(h.saw(member, "I have no started tasks in Inbox"));
    assert_eq!(h.node(member).await, MenuNode::Folder(Relationship::Inbox));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_flow_stores_latest_comment() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    let task = h.task(owner, assignee, "Fix roof").await?;

    h.press(assignee, "Comment|1", None).await;
    assert_eq!(h.node(assignee).await, MenuNode::Comment);
    assert!(h.last(assignee)?.text.ends_with("Enter comment:"));

    h.text(assignee, "  Looks good  ").await;

    let stored = h.stored(task.id()).await?;
    let comment = stored
        .comment()
        .ok_or_else(|| eyre::eyre!("comment missing"))?;
    assert_eq!(comment.text, "Looks good");
    assert_eq!(comment.author, assignee);
    assert_eq!(h.tasks.history(task.id()).await?.len(), 2);
    assert_eq!(h.node(assignee).await, MenuNode::Main);
    assert!(h.saw(assignee, "Comment has been saved for Task 1"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_comment_is_not_stored() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    let task = h.task(owner, assignee, "Fix roof").await?;

    h.press(owner, "Comment|1", None).await;
    h.text(owner, "Cancel").await;

    assert!(h.stored(task.id()).await?.comment().is_none());
    assert_eq!(h.node(owner).await, MenuNode::Main);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_is_refused_where_rules_forbid_it() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    h.task(owner, assignee, "Fix roof").await?;
    h.press(assignee, "Complete|1", None).await;

    h.press(assignee, "Comment|1", None).await;

    assert!(h.saw(assignee, "It isn't allowed to comment Task #1"));
    assert_eq!(h.node(assignee).await, MenuNode::Main);
    assert_eq!(action_labels(&h.last(assignee)?), vec!["History"]);
    Ok(())
}
