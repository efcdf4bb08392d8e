//! Event store port for the append-only task event log.

use crate::tasking::domain::{
    AppendPrecondition, NewTaskEvent, ProjectId, TaskEvent, TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event store operations.
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Outcome of a conditional append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The precondition held at commit time; the event was appended with its
    /// assigned sequence.
    Appended(TaskEvent),
    /// The precondition no longer held at commit time; nothing was written.
    /// This is the expected outcome of a losing race, not a fault.
    PreconditionFailed,
}

/// Append-only task event log contract.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - `append_if` re-validates the precondition against the latest committed
///   event and inserts as one indivisible operation; a competing append on
///   the same task can never observe the check and the write as two steps.
/// - Append serialization is scoped to a single task; appends to different
///   tasks do not block each other.
/// - Sequence markers are strictly monotonic, so "the latest event" is
///   unambiguous without consulting wall clocks.
/// - Reads observe every acknowledged append (read-your-writes); projection
///   reads never take the append serialization path.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends `event` only if `precondition` still holds against the
    /// task's latest committed event.
    ///
    /// All-or-nothing: on [`AppendOutcome::PreconditionFailed`] no partial
    /// state change remains.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Persistence`] when the underlying store
    /// is unavailable or the condition could not be evaluated.
    async fn append_if(
        &self,
        precondition: &AppendPrecondition,
        event: NewTaskEvent,
    ) -> EventStoreResult<AppendOutcome>;

    /// Returns the maximum-sequence event for a task, or `None` for a task
    /// with an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Persistence`] when the lookup fails.
    async fn latest_event(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Option<TaskEvent>>;

    /// Returns the latest event of every task in a project that has at
    /// least one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Persistence`] when the lookup fails.
    async fn latest_events(&self, project_id: ProjectId) -> EventStoreResult<Vec<TaskEvent>>;

    /// Returns a task's full event log in ascending sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`EventStoreError::Persistence`] when the lookup fails.
    async fn task_history(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Vec<TaskEvent>>;
}

/// Errors returned by event store implementations.
#[derive(Debug, Clone, Error)]
pub enum EventStoreError {
    /// Persistence-layer failure.
    #[error("event store failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
