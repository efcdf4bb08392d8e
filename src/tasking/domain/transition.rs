//! Declarative transition table and append preconditions.
//!
//! Each action maps to exactly one [`TransitionRule`] describing the state
//! the task must currently be in, whose identity is allowed (and recorded),
//! and the state the resulting event carries. The table is a total `match`,
//! so a new action or state without a rule fails to compile rather than
//! silently no-opping.

use super::{ActorId, TaskAction, TaskEvent, TaskProjection, TaskState};

/// Identity constraint of a transition, deciding both who may act and whose
/// identity the resulting event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderRule {
    /// Any authenticated actor may act; the caller is recorded.
    AnyActor,
    /// Only the current holder may act; the caller is recorded.
    CurrentHolder,
    /// The event records the actor of the pending mapping request, not the
    /// caller. The caller's identity is neither checked nor recorded; the
    /// routing layer owns any approver authorisation.
    PendingRequester,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// State the latest event must carry for the action to be legal.
    pub predecessor: TaskState,
    /// Identity constraint applied at append time.
    pub holder_rule: HolderRule,
    /// State the appended event will carry.
    pub resulting_state: TaskState,
    /// Comment recorded when the caller supplies none.
    pub default_comment: &'static str,
}

impl TaskAction {
    /// Returns the transition rule governing this action.
    #[must_use]
    pub const fn rule(self) -> TransitionRule {
        match self {
            Self::Request => TransitionRule {
                predecessor: TaskState::UnlockedToMap,
                holder_rule: HolderRule::AnyActor,
                resulting_state: TaskState::RequestForMapping,
                default_comment: "Request for mapping",
            },
            Self::ApproveMap => TransitionRule {
                predecessor: TaskState::RequestForMapping,
                holder_rule: HolderRule::PendingRequester,
                resulting_state: TaskState::LockedForMapping,
                default_comment: "Request accepted for mapping",
            },
            Self::RejectMap => TransitionRule {
                predecessor: TaskState::RequestForMapping,
                holder_rule: HolderRule::PendingRequester,
                resulting_state: TaskState::UnlockedToMap,
                default_comment: "Request for mapping rejected",
            },
            Self::FinishMapping => TransitionRule {
                predecessor: TaskState::LockedForMapping,
                holder_rule: HolderRule::CurrentHolder,
                resulting_state: TaskState::UnlockedToValidate,
                default_comment: "Done: unlocked to validate",
            },
            Self::ClaimValidation => TransitionRule {
                predecessor: TaskState::UnlockedToValidate,
                holder_rule: HolderRule::AnyActor,
                resulting_state: TaskState::LockedForValidation,
                default_comment: "Done: locked for validation",
            },
            Self::AcceptValidation => TransitionRule {
                predecessor: TaskState::LockedForValidation,
                holder_rule: HolderRule::CurrentHolder,
                resulting_state: TaskState::UnlockedDone,
                default_comment: "Done: Task is Good",
            },
            Self::RejectValidation => TransitionRule {
                predecessor: TaskState::LockedForValidation,
                holder_rule: HolderRule::CurrentHolder,
                resulting_state: TaskState::UnlockedToMap,
                default_comment: "Done: needs to redo",
            },
        }
    }
}

/// Predecessor condition an append must re-validate at commit time.
///
/// Stores evaluate this against the latest committed event inside the same
/// atomic operation that inserts the new one; a stale snapshot read before
/// the append never decides the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendPrecondition {
    required_state: TaskState,
    required_holder: Option<ActorId>,
}

impl AppendPrecondition {
    /// Creates a precondition on the predecessor state, optionally also
    /// requiring the current holder to be a specific actor.
    #[must_use]
    pub const fn new(required_state: TaskState, required_holder: Option<ActorId>) -> Self {
        Self {
            required_state,
            required_holder,
        }
    }

    /// Returns the required predecessor state.
    #[must_use]
    pub const fn required_state(&self) -> TaskState {
        self.required_state
    }

    /// Returns the required holder, if any.
    #[must_use]
    pub const fn required_holder(&self) -> Option<&ActorId> {
        self.required_holder.as_ref()
    }

    /// Evaluates the precondition against the latest committed event.
    ///
    /// An empty log satisfies a required [`TaskState::UnlockedToMap`], since
    /// that is the implicit state of a task with no events.
    #[must_use]
    pub fn is_satisfied_by(&self, latest: Option<&TaskEvent>) -> bool {
        let projection = TaskProjection::from_latest(latest);
        if projection.state() != self.required_state {
            return false;
        }
        match self.required_holder() {
            None => true,
            Some(required) => projection.holder() == Some(required),
        }
    }
}
