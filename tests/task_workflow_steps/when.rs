//! When steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use rstest_bdd_macros::when;
use tasker::task::domain::TaskAction;
use tasker::user::domain::UserId;

#[when(r#"user {viewer:i64} performs "{action}""#)]
fn user_performs(
    world: &mut TaskWorkflowWorld,
    viewer: i64,
    action: String,
) -> Result<(), eyre::Report> {
    let parsed = TaskAction::try_from(action.as_str())
        .map_err(|err| eyre::eyre!("invalid action in scenario: {err}"))?;
    let id = world.task()?.id();
    let result = run_async(world.service.transition(UserId::new(viewer)?, id, parsed));
    if let Ok(ref view) = result {
        world.task = Some(view.task.clone());
    }
    world.last_result = Some(result);
    Ok(())
}
