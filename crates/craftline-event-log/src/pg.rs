//! `PostgreSQL` implementation of the [`EventLog`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::log::{EventLog, EventLogError, ListenerCompletion};
use crate::record::{EventFilter, EventRecord, ListenerRecord};
use crate::schema::CREATE_WORKFLOW_EVENTS_TABLE;

const SELECT_COLUMNS: &str =
    "SELECT event_id, event_type, payload, origin, actor_id, occurred_at, processed, listeners \
     FROM workflow_events";

/// PostgreSQL-backed event log.
///
/// Payload and listener sub-records are stored as JSONB on a single row per
/// event. Listener mutations are read-modify-write on that row, which is
/// safe because the dispatcher serializes mutations per record.
#[derive(Debug, Clone)]
pub struct PgEventLog {
    pool: PgPool,
}

impl PgEventLog {
    /// Creates a new `PgEventLog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `workflow_events` table and its indexes if missing.
    ///
    /// # Errors
    ///
    /// Returns `EventLogError::Storage` if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), EventLogError> {
        sqlx::raw_sql(CREATE_WORKFLOW_EVENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn load(&self, event_id: Uuid) -> Result<EventRecord, EventLogError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE event_id = $1"))
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        row.as_ref()
            .map(row_to_record)
            .transpose()?
            .ok_or(EventLogError::EventNotFound(event_id))
    }

    async fn store_processing_state(&self, record: &EventRecord) -> Result<(), EventLogError> {
        sqlx::query("UPDATE workflow_events SET listeners = $2, processed = $3 WHERE event_id = $1")
            .bind(record.event_id)
            .bind(to_json(&record.listeners)?)
            .bind(record.processed)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error(err: sqlx::Error) -> EventLogError {
    EventLogError::Storage(err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, EventLogError> {
    serde_json::to_value(value).map_err(|err| EventLogError::Storage(err.to_string()))
}

fn row_to_record(row: &PgRow) -> Result<EventRecord, EventLogError> {
    let payload: serde_json::Value = row.try_get("payload").map_err(storage_error)?;
    let listeners: serde_json::Value = row.try_get("listeners").map_err(storage_error)?;
    Ok(EventRecord {
        event_id: row.try_get("event_id").map_err(storage_error)?,
        event_type: row.try_get("event_type").map_err(storage_error)?,
        payload: serde_json::from_value(payload)
            .map_err(|err| EventLogError::Storage(err.to_string()))?,
        origin: row.try_get("origin").map_err(storage_error)?,
        actor_id: row.try_get("actor_id").map_err(storage_error)?,
        occurred_at: row.try_get("occurred_at").map_err(storage_error)?,
        processed: row.try_get("processed").map_err(storage_error)?,
        listeners: serde_json::from_value::<Vec<ListenerRecord>>(listeners)
            .map_err(|err| EventLogError::Storage(err.to_string()))?,
    })
}

#[async_trait]
impl EventLog for PgEventLog {
    async fn append(&self, record: EventRecord) -> Result<EventRecord, EventLogError> {
        sqlx::query(
            "INSERT INTO workflow_events \
             (event_id, event_type, payload, origin, actor_id, occurred_at, processed, listeners) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.event_id)
        .bind(&record.event_type)
        .bind(to_json(&record.payload)?)
        .bind(&record.origin)
        .bind(record.actor_id)
        .bind(record.occurred_at)
        .bind(record.processed)
        .bind(to_json(&record.listeners)?)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(record)
    }

    async fn mark_listener_pending(
        &self,
        event_id: Uuid,
        listener: &str,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        let mut record = self.load(event_id).await?;
        record.push_listener_pending(listener, at);
        self.store_processing_state(&record).await?;
        Ok(record)
    }

    async fn complete_listener(
        &self,
        event_id: Uuid,
        listener: &str,
        completion: ListenerCompletion,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        let mut record = self.load(event_id).await?;
        if !record.complete_listener_entry(listener, completion, at) {
            return Err(EventLogError::ListenerEntryMissing {
                event_id,
                listener: listener.to_owned(),
            });
        }
        self.store_processing_state(&record).await?;
        Ok(record)
    }

    async fn recompute_processed(&self, event_id: Uuid) -> Result<EventRecord, EventLogError> {
        let mut record = self.load(event_id).await?;
        record.recompute_processed();
        self.store_processing_state(&record).await?;
        Ok(record)
    }

    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<EventRecord>, EventLogError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE event_id = $1"))
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn history(
        &self,
        filter: &EventFilter,
        limit: usize,
    ) -> Result<Vec<EventRecord>, EventLogError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} \
             WHERE ($1::text IS NULL OR event_type = $1) \
               AND ($2::text IS NULL OR origin = $2) \
             ORDER BY occurred_at DESC \
             LIMIT $3"
        ))
        .bind(filter.event_type.as_deref())
        .bind(filter.origin.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.iter().map(row_to_record).collect()
    }

    async fn pending(&self) -> Result<Vec<EventRecord>, EventLogError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE NOT processed ORDER BY occurred_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.iter().map(row_to_record).collect()
    }
}
