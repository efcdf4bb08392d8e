//! Read-only query surface over the task event log.

use crate::tasking::{
    domain::{ProjectId, TaskEvent, TaskId, TaskProjection, TaskStatus},
    ports::{EventStore, EventStoreResult},
};
use std::sync::Arc;

/// Read-only projections of current task state.
///
/// Queries never take the append serialisation path; they read whatever the
/// log holds, including every acknowledged append.
#[derive(Clone)]
pub struct TaskQueries<S>
where
    S: EventStore,
{
    store: Arc<S>,
}

impl<S> TaskQueries<S>
where
    S: EventStore,
{
    /// Creates a new query surface over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Projects one task's current state and holder.
    ///
    /// A task with no events projects the implicit default state.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn task_state(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<TaskProjection> {
        let latest = self.store.latest_event(project_id, task_id).await?;
        Ok(TaskProjection::from_latest(latest.as_ref()))
    }

    /// Projects the current state of every task in a project that has at
    /// least one event.
    ///
    /// Tasks that were never acted on do not appear; the project aggregate
    /// owns the full task universe.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn project_states(&self, project_id: ProjectId) -> EventStoreResult<Vec<TaskStatus>> {
        let latest = self.store.latest_events(project_id).await?;
        Ok(latest.iter().map(TaskStatus::from_latest_event).collect())
    }

    /// Returns a task's full event log in ascending sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn task_history(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Vec<TaskEvent>> {
        self.store.task_history(project_id, task_id).await
    }
}
