//! In-memory integration tests for concurrent claim resolution.

use super::helpers::{TestHarness, harness, map_task, transition};
use meridian::tasking::{
    domain::{ActorId, TaskAction, TaskId, TaskState},
    services::TransitionError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_admit_exactly_one_winner(harness: TestHarness) -> eyre::Result<()> {
    let task_id = TaskId::new();
    let first = tokio::spawn({
        let engine = harness.engine.clone();
        let request = transition(&harness, task_id, TaskAction::Request, "mapper-a")?;
        async move { engine.attempt_transition(request).await }
    });
    let second = tokio::spawn({
        let engine = harness.engine.clone();
        let request = transition(&harness, task_id, TaskAction::Request, "mapper-b")?;
        async move { engine.attempt_transition(request).await }
    });

    let outcomes = [first.await?, second.await?];
    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    eyre::ensure!(winners == 1, "expected exactly one winner, found {winners}");
    eyre::ensure!(
        outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Err(TransitionError::Rejected { .. })))
            .count()
            == 1,
        "the loser must see a precondition rejection"
    );

    let history = harness.queries.task_history(harness.project_id, task_id).await?;
    eyre::ensure!(history.len() == 1, "only the winning event may be appended");

    let projection = harness.queries.task_state(harness.project_id, task_id).await?;
    eyre::ensure!(projection.state() == TaskState::RequestForMapping);
    let winning_actor = outcomes
        .iter()
        .find_map(|outcome| outcome.as_ref().ok())
        .map(|event| event.actor_id().clone())
        .ok_or_else(|| eyre::eyre!("missing winning event"))?;
    eyre::ensure!(projection.holder() == Some(&winning_actor));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_validation_claims_admit_exactly_one_winner(
    harness: TestHarness,
) -> eyre::Result<()> {
    let task_id = TaskId::new();
    map_task(&harness, task_id, "mapper-a").await?;

    let validators = ["validator-b", "validator-c", "validator-d"];
    let mut claims = Vec::new();
    for validator in validators {
        let engine = harness.engine.clone();
        let request = transition(&harness, task_id, TaskAction::ClaimValidation, validator)?;
        claims.push(tokio::spawn(
            async move { engine.attempt_transition(request).await },
        ));
    }

    let mut winners = 0_usize;
    for claim in claims {
        if claim.await?.is_ok() {
            winners += 1;
        }
    }
    eyre::ensure!(winners == 1, "expected exactly one winner, found {winners}");

    let projection = harness.queries.task_state(harness.project_id, task_id).await?;
    eyre::ensure!(projection.state() == TaskState::LockedForValidation);
    eyre::ensure!(projection.holder().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn contended_tasks_never_gain_two_holders(harness: TestHarness) -> eyre::Result<()> {
    // Hammer a pool of tasks with competing requests and check that
    // each task ends up with a single claim in its log.
    let tasks: Vec<TaskId> = (0..8).map(|_| TaskId::new()).collect();
    let mut attempts = Vec::new();
    for &task_id in &tasks {
        for mapper in ["mapper-a", "mapper-b", "mapper-c", "mapper-d"] {
            let engine = harness.engine.clone();
            let request = transition(&harness, task_id, TaskAction::Request, mapper)?;
            attempts.push(tokio::spawn(async move {
                engine.attempt_transition(request).await
            }));
        }
    }
    for attempt in attempts {
        let _ = attempt.await?;
    }

    for task_id in tasks {
        let history = harness.queries.task_history(harness.project_id, task_id).await?;
        eyre::ensure!(
            history.len() == 1,
            "task must record exactly one claim, found {}",
            history.len()
        );
        let projection = harness.queries.task_state(harness.project_id, task_id).await?;
        eyre::ensure!(projection.state() == TaskState::RequestForMapping);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_successful_transition_is_immediately_visible(harness: TestHarness) -> eyre::Result<()> {
    let task_id = TaskId::new();
    let appended = harness
        .engine
        .attempt_transition(transition(&harness, task_id, TaskAction::Request, "mapper-a")?)
        .await?;

    let projection = harness.queries.task_state(harness.project_id, task_id).await?;
    eyre::ensure!(projection.state() == appended.state());
    eyre::ensure!(projection.holder() == Some(&ActorId::new("mapper-a")?));
    Ok(())
}
