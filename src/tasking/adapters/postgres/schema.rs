//! Diesel schema for the task event log.

diesel::table! {
    /// Append-only task events; rows are never updated or deleted.
    task_events (event_id) {
        /// Event identifier.
        event_id -> Uuid,
        /// Project the task belongs to.
        project_id -> Uuid,
        /// Task the event belongs to.
        task_id -> Uuid,
        /// Identity recorded as having caused the event.
        #[max_length = 255]
        actor_id -> Varchar,
        /// Resulting task state.
        #[max_length = 50]
        state -> Varchar,
        /// Free-text annotation.
        comment -> Text,
        /// Database-assigned strictly monotonic ordering marker.
        sequence -> Int8,
        /// Creation timestamp; informational only.
        created_at -> Timestamptz,
    }
}
