//! Meridian: collaborative mapping task coordination.
//!
//! This crate provides the task-claim and state-transition engine used to
//! coordinate many remote mappers and validators working on the discrete
//! work units of a mapping project, without a central lock manager.
//!
//! # Architecture
//!
//! Meridian follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`tasking`]: Task event log, transition rules, and projections

pub mod tasking;
