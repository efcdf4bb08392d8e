//! Unit tests for the tasking module.
