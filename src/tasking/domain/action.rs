//! Action vocabulary accepted by the transition engine.

use super::ParseTaskActionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External action requested against a task.
///
/// The set is closed and every member has exactly one [`TransitionRule`];
/// there is no fallthrough that could silently ignore an action.
///
/// [`TransitionRule`]: super::TransitionRule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAction {
    /// Ask to map an available task.
    Request,
    /// Approve the pending mapping request.
    ApproveMap,
    /// Reject the pending mapping request.
    RejectMap,
    /// Finish mapping and release the task for validation.
    FinishMapping,
    /// Claim a finished task for validation review.
    ClaimValidation,
    /// Accept the mapped work, completing the task.
    AcceptValidation,
    /// Reject the mapped work, returning the task to the mapping pool.
    RejectValidation,
}

impl TaskAction {
    /// Returns the canonical wire representation.
    ///
    /// The short forms (`MAP`, `GOOD`, `BAD`) are the vocabulary the routing
    /// layer has always spoken for approval and validation verdicts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::ApproveMap => "MAP",
            Self::RejectMap => "REJECTED",
            Self::FinishMapping => "FINISH",
            Self::ClaimValidation => "VALIDATE",
            Self::AcceptValidation => "GOOD",
            Self::RejectValidation => "BAD",
        }
    }
}

impl TryFrom<&str> for TaskAction {
    type Error = ParseTaskActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "REQUEST" => Ok(Self::Request),
            "MAP" => Ok(Self::ApproveMap),
            "REJECTED" => Ok(Self::RejectMap),
            "FINISH" => Ok(Self::FinishMapping),
            "VALIDATE" => Ok(Self::ClaimValidation),
            "GOOD" => Ok(Self::AcceptValidation),
            "BAD" => Ok(Self::RejectValidation),
            _ => Err(ParseTaskActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
