//! Task claim and state-transition management for Meridian.
//!
//! A task's current state is never stored on a task row; it is derived from
//! the most recent entry in an append-only event log. The transition engine
//! validates each requested action against a declarative transition table
//! and commits the resulting event with a conditional append, so two actors
//! racing for the same task cannot both win. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
