//! Application services for task transition orchestration and queries.

mod engine;
mod queries;

pub use engine::{TransitionEngine, TransitionError, TransitionRequest, TransitionResult};
pub use queries::TaskQueries;
