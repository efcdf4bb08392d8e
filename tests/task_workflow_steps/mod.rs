//! Step definitions for task workflow BDD scenarios.

pub mod world;
