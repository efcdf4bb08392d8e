//! Diesel row models for task event persistence.

use super::schema::task_events;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task events.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = task_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskEventRow {
    /// Event identifier.
    pub event_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
    /// Task identifier.
    pub task_id: uuid::Uuid,
    /// Acting identity.
    pub actor_id: String,
    /// Resulting state.
    pub state: String,
    /// Free-text annotation.
    pub comment: String,
    /// Database-assigned ordering marker.
    pub sequence: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task events.
///
/// The `sequence` column is an identity column assigned by the database
/// inside the committing insert, so it is absent here.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_events)]
pub struct NewTaskEventRow {
    /// Event identifier.
    pub event_id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
    /// Task identifier.
    pub task_id: uuid::Uuid,
    /// Acting identity.
    pub actor_id: String,
    /// Resulting state.
    pub state: String,
    /// Free-text annotation.
    pub comment: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
