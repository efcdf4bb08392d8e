//! In-memory adapters for tasking tests and embedded use.

mod event_store;

pub use event_store::InMemoryEventStore;
