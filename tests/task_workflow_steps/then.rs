//! Then steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use rstest_bdd_macros::then;
use tasker::task::{domain::TaskStatus, ports::TaskRepository, services::TaskWorkflowError};
use tasker::user::domain::UserId;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskWorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let id = world.task()?.id();
    let stored = run_async(world.service.repository().find_by_id(id))?
        .ok_or_else(|| eyre::eyre!("task {id} missing from storage"))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"user {viewer:i64} may perform "{actions}""#)]
fn user_may_perform(
    world: &TaskWorkflowWorld,
    viewer: i64,
    actions: String,
) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let view = run_async(world.service.view(UserId::new(viewer)?, id))?;
    let offered: Vec<&str> = view.actions.iter().map(|action| action.label()).collect();
    let expected: Vec<&str> = actions.split(',').map(str::trim).collect();

    if offered != expected {
        return Err(eyre::eyre!("expected actions {expected:?}, got {offered:?}"));
    }
    Ok(())
}

#[then("the task history has {count:usize} entries")]
fn history_has_entries(world: &TaskWorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let entries = run_async(world.service.repository().history(id))?;

    if entries.len() != count {
        return Err(eyre::eyre!(
            "expected {count} history entries, found {}",
            entries.len()
        ));
    }
    Ok(())
}

#[then("the action is rejected as not allowed")]
fn rejected_as_not_allowed(world: &TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;

    if !matches!(result, Err(TaskWorkflowError::ActionNotAllowed { .. })) {
        return Err(eyre::eyre!("expected ActionNotAllowed error, got {result:?}"));
    }
    Ok(())
}

#[then("the action is rejected as access denied")]
fn rejected_as_access_denied(world: &TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;

    if !matches!(result, Err(TaskWorkflowError::AccessDenied { .. })) {
        return Err(eyre::eyre!("expected AccessDenied error, got {result:?}"));
    }
    Ok(())
}
