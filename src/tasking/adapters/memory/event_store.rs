//! In-memory event store for tasking tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::tasking::{
    domain::{AppendPrecondition, EventSequence, NewTaskEvent, ProjectId, TaskEvent, TaskId},
    ports::{AppendOutcome, EventStore, EventStoreError, EventStoreResult},
};

/// Thread-safe in-memory event store.
///
/// The write lock is held across the precondition check and the push, which
/// makes the conditional append indivisible with respect to concurrent
/// attempts, matching the port contract.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    state: Arc<RwLock<InMemoryLogState>>,
}

#[derive(Debug, Default)]
struct InMemoryLogState {
    logs: HashMap<(ProjectId, TaskId), Vec<TaskEvent>>,
    last_sequence: EventSequence,
}

impl InMemoryEventStore {
    /// Creates an empty in-memory event store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> EventStoreError {
    EventStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_if(
        &self,
        precondition: &AppendPrecondition,
        event: NewTaskEvent,
    ) -> EventStoreResult<AppendOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;

        let key = (event.project_id(), event.task_id());
        let latest = state.logs.get(&key).and_then(|log| log.last());
        if !precondition.is_satisfied_by(latest) {
            return Ok(AppendOutcome::PreconditionFailed);
        }

        let sequence = state.last_sequence.next();
        state.last_sequence = sequence;
        let appended = event.into_event(sequence);
        state.logs.entry(key).or_default().push(appended.clone());
        Ok(AppendOutcome::Appended(appended))
    }

    async fn latest_event(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Option<TaskEvent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .logs
            .get(&(project_id, task_id))
            .and_then(|log| log.last())
            .cloned())
    }

    async fn latest_events(&self, project_id: ProjectId) -> EventStoreResult<Vec<TaskEvent>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut latest: Vec<TaskEvent> = state
            .logs
            .iter()
            .filter(|((project, _), _)| *project == project_id)
            .filter_map(|(_, log)| log.last().cloned())
            .collect();
        latest.sort_by_key(TaskEvent::task_id);
        Ok(latest)
    }

    async fn task_history(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Vec<TaskEvent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .logs
            .get(&(project_id, task_id))
            .cloned()
            .unwrap_or_default())
    }
}
