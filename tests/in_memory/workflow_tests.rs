//! In-memory integration tests for complete task workflows.

use super::helpers::{TestHarness, harness, map_task, transition};
use meridian::tasking::domain::{ActorId, TaskAction, TaskId, TaskState};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_records_every_transition_in_sequence_order(
    harness: TestHarness,
) -> eyre::Result<()> {
    let task_id = TaskId::new();
    map_task(&harness, task_id, "mapper-a").await?;
    harness
        .engine
        .attempt_transition(transition(
            &harness,
            task_id,
            TaskAction::ClaimValidation,
            "validator-b",
        )?)
        .await?;
    harness
        .engine
        .attempt_transition(transition(
            &harness,
            task_id,
            TaskAction::AcceptValidation,
            "validator-b",
        )?)
        .await?;

    let history = harness.queries.task_history(harness.project_id, task_id).await?;

    let expected_states = [
        TaskState::RequestForMapping,
        TaskState::LockedForMapping,
        TaskState::UnlockedToValidate,
        TaskState::LockedForValidation,
        TaskState::UnlockedDone,
    ];
    eyre::ensure!(history.len() == expected_states.len());
    for (event, expected) in history.iter().zip(expected_states) {
        eyre::ensure!(
            event.state() == expected,
            "expected {expected} in history, found {}",
            event.state()
        );
    }
    for (earlier, later) in history.iter().zip(history.iter().skip(1)) {
        eyre::ensure!(
            earlier.sequence() < later.sequence(),
            "history sequences must be strictly increasing"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redo_loop_preserves_the_full_audit_trail(harness: TestHarness) -> eyre::Result<()> {
    let task_id = TaskId::new();
    map_task(&harness, task_id, "mapper-a").await?;
    harness
        .engine
        .attempt_transition(transition(
            &harness,
            task_id,
            TaskAction::ClaimValidation,
            "validator-b",
        )?)
        .await?;
    harness
        .engine
        .attempt_transition(transition(
            &harness,
            task_id,
            TaskAction::RejectValidation,
            "validator-b",
        )?)
        .await?;

    // The task is back in the mapping pool; a second mapper picks it up.
    map_task(&harness, task_id, "mapper-c").await?;

    let history = harness.queries.task_history(harness.project_id, task_id).await?;
    eyre::ensure!(history.len() == 8, "redo loop must append, never rewrite");

    let projection = harness.queries.task_state(harness.project_id, task_id).await?;
    eyre::ensure!(projection.state() == TaskState::UnlockedToValidate);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_states_returns_one_row_per_evented_task(
    harness: TestHarness,
) -> eyre::Result<()> {
    let mapped = TaskId::new();
    let requested = TaskId::new();
    let untouched = TaskId::new();

    map_task(&harness, mapped, "mapper-a").await?;
    harness
        .engine
        .attempt_transition(transition(
            &harness,
            requested,
            TaskAction::Request,
            "mapper-b",
        )?)
        .await?;

    let statuses = harness.queries.project_states(harness.project_id).await?;

    // Tasks with no events are not listed; callers treat absence as the
    // default state.
    eyre::ensure!(statuses.len() == 2);
    eyre::ensure!(!statuses.iter().any(|status| status.task_id == untouched));

    let mapped_row = statuses
        .iter()
        .find(|status| status.task_id == mapped)
        .ok_or_else(|| eyre::eyre!("mapped task missing from project states"))?;
    eyre::ensure!(mapped_row.state == TaskState::UnlockedToValidate);
    eyre::ensure!(mapped_row.holder.is_none());

    let requested_row = statuses
        .iter()
        .find(|status| status.task_id == requested)
        .ok_or_else(|| eyre::eyre!("requested task missing from project states"))?;
    eyre::ensure!(requested_row.state == TaskState::RequestForMapping);
    eyre::ensure!(requested_row.holder == Some(ActorId::new("mapper-b")?));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_states_reflects_only_the_latest_event(harness: TestHarness) -> eyre::Result<()> {
    let task_id = TaskId::new();
    harness
        .engine
        .attempt_transition(transition(&harness, task_id, TaskAction::Request, "mapper-a")?)
        .await?;
    harness
        .engine
        .attempt_transition(transition(&harness, task_id, TaskAction::RejectMap, "manager")?)
        .await?;

    let statuses = harness.queries.project_states(harness.project_id).await?;
    eyre::ensure!(statuses.len() == 1);
    let only = statuses
        .first()
        .ok_or_else(|| eyre::eyre!("expected one status row"))?;
    eyre::ensure!(only.state == TaskState::UnlockedToMap);
    eyre::ensure!(only.holder.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_in_different_projects_do_not_interfere(harness: TestHarness) -> eyre::Result<()> {
    let task_id = TaskId::new();
    harness
        .engine
        .attempt_transition(transition(&harness, task_id, TaskAction::Request, "mapper-a")?)
        .await?;

    // The same task identifier under another project has its own log.
    let other_project = meridian::tasking::domain::ProjectId::new();
    let other = harness
        .queries
        .task_state(other_project, task_id)
        .await?;
    eyre::ensure!(other.state() == TaskState::UnlockedToMap);
    eyre::ensure!(harness.queries.project_states(other_project).await?.is_empty());
    Ok(())
}
