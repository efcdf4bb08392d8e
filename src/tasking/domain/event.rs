//! Immutable task events and the append payload that produces them.

use super::{ActorId, EventId, EventSequence, ProjectId, TaskId, TaskState};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One immutable entry in a task's append-only event log.
///
/// Events are created exclusively by an event store's conditional append and
/// are never edited, reordered, or deleted afterwards. The `state` field is
/// the state *resulting* from the recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvent {
    event_id: EventId,
    project_id: ProjectId,
    task_id: TaskId,
    actor_id: ActorId,
    state: TaskState,
    comment: String,
    sequence: EventSequence,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEventData {
    /// Persisted event identifier.
    pub event_id: EventId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted task identifier.
    pub task_id: TaskId,
    /// Persisted acting identity.
    pub actor_id: ActorId,
    /// Persisted resulting state.
    pub state: TaskState,
    /// Persisted free-text annotation.
    pub comment: String,
    /// Persisted ordering marker.
    pub sequence: EventSequence,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskEvent {
    /// Reconstructs an event from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedEventData) -> Self {
        Self {
            event_id: data.event_id,
            project_id: data.project_id,
            task_id: data.task_id,
            actor_id: data.actor_id,
            state: data.state,
            comment: data.comment,
            sequence: data.sequence,
            created_at: data.created_at,
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the project the task belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task this event belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the identity recorded as having caused the event.
    #[must_use]
    pub const fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the state resulting from this event.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the free-text annotation. Never semantically interpreted.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the ordering marker assigned at append time.
    #[must_use]
    pub const fn sequence(&self) -> EventSequence {
        self.sequence
    }

    /// Returns the creation timestamp. Informational only; ordering always
    /// uses [`TaskEvent::sequence`].
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Payload for a conditional append; everything of a [`TaskEvent`] except
/// the sequence marker, which the store assigns at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskEvent {
    event_id: EventId,
    project_id: ProjectId,
    task_id: TaskId,
    actor_id: ActorId,
    state: TaskState,
    comment: String,
    created_at: DateTime<Utc>,
}

impl NewTaskEvent {
    /// Creates an append payload with a fresh event identifier and a
    /// timestamp from the given clock.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        task_id: TaskId,
        actor_id: ActorId,
        state: TaskState,
        comment: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            project_id,
            task_id,
            actor_id,
            state,
            comment: comment.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the project the task belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task the event targets.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the identity to record on the event.
    #[must_use]
    pub const fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the resulting state the event will carry.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the annotation to record.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completes the payload into an event with its assigned sequence.
    ///
    /// Called by stores once the conditional append has committed.
    #[must_use]
    pub fn into_event(self, sequence: EventSequence) -> TaskEvent {
        TaskEvent {
            event_id: self.event_id,
            project_id: self.project_id,
            task_id: self.task_id,
            actor_id: self.actor_id,
            state: self.state,
            comment: self.comment,
            sequence,
            created_at: self.created_at,
        }
    }
}
