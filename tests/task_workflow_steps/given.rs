//! Given steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasker::task::domain::{TaskAction, TaskDraft};
use tasker::user::domain::UserId;

#[given("a task from owner {owner:i64} assigned to user {assignee:i64}")]
fn task_from_owner(
    world: &mut TaskWorkflowWorld,
    owner: i64,
    assignee: i64,
) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(
        UserId::new(owner)?,
        UserId::new(assignee)?,
        "Fix roof",
        "before winter",
    )?;
    let created = run_async(world.service.create(draft)).wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"user {viewer:i64} has performed "{action}""#)]
fn user_has_performed(
    world: &mut TaskWorkflowWorld,
    viewer: i64,
    action: String,
) -> Result<(), eyre::Report> {
    let parsed = TaskAction::try_from(action.as_str())
        .map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))?;
    let id = world.task()?.id();
    let view = run_async(world.service.transition(UserId::new(viewer)?, id, parsed))
        .wrap_err("apply action in scenario setup")?;
    world.task = Some(view.task);
    Ok(())
}
