//! Task state enumeration derived from the latest event in the log.

use super::ParseTaskStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current lifecycle state of a task, as recorded by its latest event.
///
/// The set is closed: every event carries exactly one of these values as the
/// state resulting from the recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Available for a mapping request. Also the implicit state of a task
    /// with no events.
    UnlockedToMap,
    /// A mapper has asked for the task and awaits approval.
    RequestForMapping,
    /// A mapper holds the task and is working on it.
    LockedForMapping,
    /// Mapping is finished; the task awaits a validator.
    UnlockedToValidate,
    /// A validator holds the task for review.
    LockedForValidation,
    /// Validation accepted the work. Terminal.
    UnlockedDone,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnlockedToMap => "UNLOCKED_TO_MAP",
            Self::RequestForMapping => "REQUEST_FOR_MAPPING",
            Self::LockedForMapping => "LOCKED_FOR_MAPPING",
            Self::UnlockedToValidate => "UNLOCKED_TO_VALIDATE",
            Self::LockedForValidation => "LOCKED_FOR_VALIDATION",
            Self::UnlockedDone => "UNLOCKED_DONE",
        }
    }

    /// Returns the implicit state of a task with no events.
    #[must_use]
    pub const fn default_state() -> Self {
        Self::UnlockedToMap
    }

    /// Returns `true` when no outbound transition is defined for this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::UnlockedDone)
    }

    /// Returns `true` when the state represents an active claim, i.e. the
    /// actor of the latest event is the task's current holder.
    #[must_use]
    pub const fn has_holder(self) -> bool {
        matches!(
            self,
            Self::RequestForMapping | Self::LockedForMapping | Self::LockedForValidation
        )
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "UNLOCKED_TO_MAP" => Ok(Self::UnlockedToMap),
            "REQUEST_FOR_MAPPING" => Ok(Self::RequestForMapping),
            "LOCKED_FOR_MAPPING" => Ok(Self::LockedForMapping),
            "UNLOCKED_TO_VALIDATE" => Ok(Self::UnlockedToValidate),
            "LOCKED_FOR_VALIDATION" => Ok(Self::LockedForValidation),
            "UNLOCKED_DONE" => Ok(Self::UnlockedDone),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
