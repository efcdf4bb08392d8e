//! `PostgreSQL` event store implementation for the task event log.
//!
//! The conditional append runs in one transaction that first takes a
//! per-task advisory lock, then re-reads the latest event and evaluates the
//! precondition, then inserts. The lock serialises check-and-append per
//! task and is released at commit or rollback; appends to distinct tasks
//! never contend. The original single-statement `INSERT … SELECT` form is
//! not safe under read-committed isolation, because two concurrent
//! statements can both see the same "latest" snapshot.

use super::{
    models::{NewTaskEventRow, TaskEventRow},
    schema::task_events,
};
use crate::tasking::{
    domain::{
        ActorId, AppendPrecondition, EventId, EventSequence, NewTaskEvent, PersistedEventData,
        ProjectId, TaskEvent, TaskId, TaskState,
    },
    ports::{AppendOutcome, EventStore, EventStoreError, EventStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use sha2::{Digest, Sha256};

/// `PostgreSQL` connection pool type used by tasking adapters.
pub type EventPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task event store.
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    pool: EventPgPool,
}

impl PostgresEventStore {
    /// Creates a new event store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: EventPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EventStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> EventStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(EventStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(EventStoreError::persistence)?
    }
}

impl From<diesel::result::Error> for EventStoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn append_if(
        &self,
        precondition: &AppendPrecondition,
        event: NewTaskEvent,
    ) -> EventStoreResult<AppendOutcome> {
        let required = precondition.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, EventStoreError, _>(|tx_conn| {
                acquire_task_lock(tx_conn, event.project_id(), event.task_id())?;

                let latest = latest_event_row(tx_conn, event.project_id(), event.task_id())?
                    .map(row_to_event)
                    .transpose()?;
                if !required.is_satisfied_by(latest.as_ref()) {
                    return Ok(AppendOutcome::PreconditionFailed);
                }

                let row = diesel::insert_into(task_events::table)
                    .values(to_new_row(&event))
                    .returning(TaskEventRow::as_returning())
                    .get_result::<TaskEventRow>(tx_conn)?;
                row_to_event(row).map(AppendOutcome::Appended)
            })
        })
        .await
    }

    async fn latest_event(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Option<TaskEvent>> {
        self.run_blocking(move |connection| {
            let row = latest_event_row(connection, project_id, task_id)?;
            row.map(row_to_event).transpose()
        })
        .await
    }

    async fn latest_events(&self, project_id: ProjectId) -> EventStoreResult<Vec<TaskEvent>> {
        self.run_blocking(move |connection| {
            let rows = task_events::table
                .filter(task_events::project_id.eq(project_id.into_inner()))
                .order((task_events::task_id.asc(), task_events::sequence.desc()))
                .distinct_on(task_events::task_id)
                .select(TaskEventRow::as_select())
                .load::<TaskEventRow>(connection)
                .map_err(EventStoreError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }

    async fn task_history(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> EventStoreResult<Vec<TaskEvent>> {
        self.run_blocking(move |connection| {
            let rows = task_events::table
                .filter(task_events::project_id.eq(project_id.into_inner()))
                .filter(task_events::task_id.eq(task_id.into_inner()))
                .order(task_events::sequence.asc())
                .select(TaskEventRow::as_select())
                .load::<TaskEventRow>(connection)
                .map_err(EventStoreError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

/// Takes the transaction-scoped advisory lock serialising appends for one
/// task. Released automatically at commit or rollback.
fn acquire_task_lock(
    connection: &mut PgConnection,
    project_id: ProjectId,
    task_id: TaskId,
) -> EventStoreResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<diesel::sql_types::BigInt, _>(task_lock_key(project_id, task_id))
        .execute(connection)
        .map_err(EventStoreError::persistence)?;
    Ok(())
}

/// Derives the 64-bit advisory lock key for a task from a SHA-256 digest of
/// both identifiers, so distinct tasks land on distinct keys with uniform
/// spread.
fn task_lock_key(project_id: ProjectId, task_id: TaskId) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(project_id.into_inner().as_bytes());
    hasher.update(task_id.into_inner().as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .take(8)
        .fold(0_i64, |key, byte| (key << 8) | i64::from(*byte))
}

fn latest_event_row(
    connection: &mut PgConnection,
    project_id: ProjectId,
    task_id: TaskId,
) -> EventStoreResult<Option<TaskEventRow>> {
    task_events::table
        .filter(task_events::project_id.eq(project_id.into_inner()))
        .filter(task_events::task_id.eq(task_id.into_inner()))
        .order(task_events::sequence.desc())
        .select(TaskEventRow::as_select())
        .first::<TaskEventRow>(connection)
        .optional()
        .map_err(EventStoreError::persistence)
}

fn to_new_row(event: &NewTaskEvent) -> NewTaskEventRow {
    NewTaskEventRow {
        event_id: event.event_id().into_inner(),
        project_id: event.project_id().into_inner(),
        task_id: event.task_id().into_inner(),
        actor_id: event.actor_id().as_str().to_owned(),
        state: event.state().as_str().to_owned(),
        comment: event.comment().to_owned(),
        created_at: event.created_at(),
    }
}

fn row_to_event(row: TaskEventRow) -> EventStoreResult<TaskEvent> {
    let TaskEventRow {
        event_id,
        project_id,
        task_id,
        actor_id: persisted_actor,
        state: persisted_state,
        comment,
        sequence: persisted_sequence,
        created_at,
    } = row;

    let actor_id = ActorId::new(persisted_actor).map_err(EventStoreError::persistence)?;
    let state =
        TaskState::try_from(persisted_state.as_str()).map_err(EventStoreError::persistence)?;
    let sequence = u64::try_from(persisted_sequence)
        .map(EventSequence::new)
        .map_err(EventStoreError::persistence)?;

    Ok(TaskEvent::from_persisted(PersistedEventData {
        event_id: EventId::from_uuid(event_id),
        project_id: ProjectId::from_uuid(project_id),
        task_id: TaskId::from_uuid(task_id),
        actor_id,
        state,
        comment,
        sequence,
        created_at,
    }))
}
