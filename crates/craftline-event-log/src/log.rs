//! Event log persistence trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::record::{EventFilter, EventRecord, ListenerFailure};

/// Errors from event log persistence.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// No record exists for the given event id.
    #[error("event not found: {0}")]
    EventNotFound(Uuid),

    /// No pending listener entry matched the given name.
    #[error("no pending entry for listener {listener} on event {event_id}")]
    ListenerEntryMissing {
        /// The event being mutated.
        event_id: Uuid,
        /// The listener name that did not match.
        listener: String,
    },

    /// A storage-layer failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Terminal result of one listener invocation.
#[derive(Debug, Clone)]
pub enum ListenerCompletion {
    /// The listener returned an outcome, recorded opaquely.
    Processed(serde_json::Value),
    /// The listener failed; the failure is recorded and terminal.
    Failed(ListenerFailure),
}

/// Durable persistence for [`EventRecord`]s.
///
/// Mutating operations target one record and return its updated state.
/// Single-record mutations are issued sequentially by the dispatcher, so
/// implementations need no cross-record locking.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Persists a freshly created record. A failure here aborts the whole
    /// emit call; no partial state is produced.
    async fn append(&self, record: EventRecord) -> Result<EventRecord, EventLogError>;

    /// Appends a pending sub-entry for `listener`.
    async fn mark_listener_pending(
        &self,
        event_id: Uuid,
        listener: &str,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError>;

    /// Moves the pending sub-entry for `listener` to a terminal status.
    async fn complete_listener(
        &self,
        event_id: Uuid,
        listener: &str,
        completion: ListenerCompletion,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError>;

    /// Recomputes and persists the derived `processed` flag.
    async fn recompute_processed(&self, event_id: Uuid) -> Result<EventRecord, EventLogError>;

    /// Loads one record by id.
    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<EventRecord>, EventLogError>;

    /// Returns up to `limit` matching records, newest first.
    async fn history(
        &self,
        filter: &EventFilter,
        limit: usize,
    ) -> Result<Vec<EventRecord>, EventLogError>;

    /// Returns all unprocessed records, oldest first.
    async fn pending(&self) -> Result<Vec<EventRecord>, EventLogError>;
}
