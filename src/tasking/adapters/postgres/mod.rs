//! `PostgreSQL` adapters for task event persistence.

mod event_store;
mod models;
mod schema;

pub use event_store::{EventPgPool, PostgresEventStore};
