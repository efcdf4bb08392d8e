//! Transition engine: validates and commits one action against one task.

use crate::tasking::{
    domain::{
        ActorId, AppendPrecondition, HolderRule, NewTaskEvent, ProjectId, TaskAction, TaskEvent,
        TaskId, TaskState,
    },
    ports::{AppendOutcome, EventStore, EventStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// One action request against one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    project_id: ProjectId,
    task_id: TaskId,
    action: TaskAction,
    actor_id: ActorId,
    comment: Option<String>,
}

impl TransitionRequest {
    /// Creates a request with the action's default comment.
    #[must_use]
    pub const fn new(
        project_id: ProjectId,
        task_id: TaskId,
        action: TaskAction,
        actor_id: ActorId,
    ) -> Self {
        Self {
            project_id,
            task_id,
            action,
            actor_id,
            comment: None,
        }
    }

    /// Overrides the recorded comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Errors surfaced by [`TransitionEngine::attempt_transition`].
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The predecessor state or holder constraint did not hold at commit
    /// time. Expected under contention; nothing was appended and retrying
    /// is the caller's decision.
    #[error("{action} rejected for task {task_id} in project {project_id}: task not in the required state")]
    Rejected {
        /// The requested action.
        action: TaskAction,
        /// Project the task belongs to.
        project_id: ProjectId,
        /// The contended task.
        task_id: TaskId,
    },

    /// An approval or rejection was requested while no mapping request is
    /// pending. Distinct from [`TransitionError::Rejected`] so callers can
    /// tell "nothing to approve" from "someone already approved it".
    #[error("no pending mapping request for task {task_id} in project {project_id}")]
    NoPendingRequest {
        /// Project the task belongs to.
        project_id: ProjectId,
        /// The task without a pending request.
        task_id: TaskId,
    },

    /// The event store failed; surfaced without internal detail.
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

/// Result type for transition engine operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Executes actions against the task event log.
///
/// The engine never serialises attempts in process: exclusivity comes from
/// the event store's conditional append, so concurrent engine instances in
/// different processes uphold the same guarantee.
pub struct TransitionEngine<S, C>
where
    S: EventStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for TransitionEngine<S, C>
where
    S: EventStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> TransitionEngine<S, C>
where
    S: EventStore,
    C: Clock + Send + Sync,
{
    /// Creates a new transition engine.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Attempts one state transition, returning the appended event.
    ///
    /// Exactly one of any set of concurrent attempts requiring the same
    /// predecessor state succeeds; every loser observes
    /// [`TransitionError::Rejected`] immediately, with no event appended
    /// and no side effect.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Rejected`] when the transition table's
    /// precondition does not hold at commit time,
    /// [`TransitionError::NoPendingRequest`] when an approval verdict finds
    /// no pending mapping request, and [`TransitionError::Store`] on
    /// persistence faults.
    pub async fn attempt_transition(
        &self,
        request: TransitionRequest,
    ) -> TransitionResult<TaskEvent> {
        let rule = request.action.rule();

        let (recorded_actor, required_holder) = match rule.holder_rule {
            HolderRule::AnyActor => (request.actor_id.clone(), None),
            HolderRule::CurrentHolder => {
                (request.actor_id.clone(), Some(request.actor_id.clone()))
            }
            HolderRule::PendingRequester => {
                let requester = self
                    .pending_requester(request.project_id, request.task_id)
                    .await?;
                (requester.clone(), Some(requester))
            }
        };

        let precondition = AppendPrecondition::new(rule.predecessor, required_holder);
        let comment = request
            .comment
            .unwrap_or_else(|| rule.default_comment.to_owned());
        let event = NewTaskEvent::new(
            request.project_id,
            request.task_id,
            recorded_actor,
            rule.resulting_state,
            comment,
            &*self.clock,
        );

        let outcome = self
            .store
            .append_if(&precondition, event)
            .await
            .inspect_err(|err| {
                error!(
                    project_id = %request.project_id,
                    task_id = %request.task_id,
                    action = %request.action,
                    %err,
                    "event store failed during conditional append"
                );
            })?;

        match outcome {
            AppendOutcome::Appended(appended) => Ok(appended),
            AppendOutcome::PreconditionFailed => {
                debug!(
                    project_id = %request.project_id,
                    task_id = %request.task_id,
                    action = %request.action,
                    "transition rejected: predecessor no longer holds"
                );
                Err(TransitionError::Rejected {
                    action: request.action,
                    project_id: request.project_id,
                    task_id: request.task_id,
                })
            }
        }
    }

    /// Resolves the actor of the pending mapping request.
    ///
    /// The request is pending only while it is the task's latest event; a
    /// request that was already approved, rejected, or otherwise superseded
    /// yields [`TransitionError::NoPendingRequest`].
    async fn pending_requester(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> TransitionResult<ActorId> {
        let latest = self.store.latest_event(project_id, task_id).await?;
        latest
            .filter(|event| event.state() == TaskState::RequestForMapping)
            .map(|event| event.actor_id().clone())
            .ok_or(TransitionError::NoPendingRequest {
                project_id,
                task_id,
            })
    }
}
