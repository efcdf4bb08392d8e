//! Port contracts for task event persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by tasking services.

pub mod event_store;

pub use event_store::{AppendOutcome, EventStore, EventStoreError, EventStoreResult};
