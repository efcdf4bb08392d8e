//! Domain model for task claim and state-transition management.
//!
//! The domain models the closed state and action vocabularies, the
//! declarative transition table, immutable task events, and latest-event
//! projection, keeping all infrastructure concerns outside of the domain
//! boundary.

mod action;
mod error;
mod event;
mod ids;
mod projection;
mod state;
mod transition;

pub use action::TaskAction;
pub use error::{ParseTaskActionError, ParseTaskStateError, TaskingDomainError};
pub use event::{NewTaskEvent, PersistedEventData, TaskEvent};
pub use ids::{ActorId, EventId, EventSequence, ProjectId, TaskId};
pub use projection::{TaskProjection, TaskStatus};
pub use state::TaskState;
pub use transition::{AppendPrecondition, HolderRule, TransitionRule};
