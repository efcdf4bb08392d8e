//! Shared world state for task workflow BDD scenarios.

use std::sync::Arc;

use meridian::tasking::{
    adapters::memory::InMemoryEventStore,
    domain::{ProjectId, TaskEvent, TaskId},
    services::{TaskQueries, TransitionEngine, TransitionError},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Engine type used by the BDD world.
pub type TestEngine = TransitionEngine<InMemoryEventStore, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct TaskWorkflowWorld {
    pub engine: TestEngine,
    pub queries: TaskQueries<InMemoryEventStore>,
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub last_transition_result: Option<Result<TaskEvent, TransitionError>>,
}

impl TaskWorkflowWorld {
    /// Creates a world with an empty event log and a fresh task.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryEventStore::new());
        Self {
            engine: TransitionEngine::new(store.clone(), Arc::new(DefaultClock)),
            queries: TaskQueries::new(store),
            project_id: ProjectId::new(),
            task_id: TaskId::new(),
            last_transition_result: None,
        }
    }
}

impl Default for TaskWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorkflowWorld {
    TaskWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
