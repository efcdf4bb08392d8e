//! Latest-event projection of task state and holder.

use super::{ActorId, TaskEvent, TaskId, TaskState};
use serde::{Deserialize, Serialize};

/// Derived current state of a task.
///
/// Never stored; always computed from the maximum-sequence event for the
/// task. Replaying the same ordered event sequence always yields the same
/// projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProjection {
    state: TaskState,
    holder: Option<ActorId>,
}

impl TaskProjection {
    /// Projects the current state and holder from the latest event.
    ///
    /// A task with no events projects the implicit default state with no
    /// holder. The holder is the latest event's actor, but only when the
    /// state represents an active claim.
    #[must_use]
    pub fn from_latest(latest: Option<&TaskEvent>) -> Self {
        latest.map_or_else(
            || Self {
                state: TaskState::default_state(),
                holder: None,
            },
            |event| Self {
                state: event.state(),
                holder: event
                    .state()
                    .has_holder()
                    .then(|| event.actor_id().clone()),
            },
        )
    }

    /// Returns the projected state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the actor entitled to act on the task, when one exists.
    #[must_use]
    pub const fn holder(&self) -> Option<&ActorId> {
        self.holder.as_ref()
    }
}

/// Bulk-query row: one task's projected state within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task identifier.
    pub task_id: TaskId,
    /// Projected state.
    pub state: TaskState,
    /// Projected holder, when the state carries one.
    pub holder: Option<ActorId>,
}

impl TaskStatus {
    /// Builds a status row from a task's latest event.
    #[must_use]
    pub fn from_latest_event(event: &TaskEvent) -> Self {
        let projection = TaskProjection::from_latest(Some(event));
        Self {
            task_id: event.task_id(),
            state: projection.state,
            holder: projection.holder,
        }
    }
}
