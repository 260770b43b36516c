//! Failing event log for error-path tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use craftline_event_log::{
    EventFilter, EventLog, EventLogError, EventRecord, ListenerCompletion,
};
use uuid::Uuid;

/// An event log that always returns a storage error. Useful for testing
/// that append failures abort the emit call.
#[derive(Debug, Default)]
pub struct FailingEventLog;

fn refused() -> EventLogError {
    EventLogError::Storage("connection refused".into())
}

#[async_trait]
impl EventLog for FailingEventLog {
    async fn append(&self, _record: EventRecord) -> Result<EventRecord, EventLogError> {
        Err(refused())
    }

    async fn mark_listener_pending(
        &self,
        _event_id: Uuid,
        _listener: &str,
        _at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        Err(refused())
    }

    async fn complete_listener(
        &self,
        _event_id: Uuid,
        _listener: &str,
        _completion: ListenerCompletion,
        _at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        Err(refused())
    }

    async fn recompute_processed(&self, _event_id: Uuid) -> Result<EventRecord, EventLogError> {
        Err(refused())
    }

    async fn find_by_id(&self, _event_id: Uuid) -> Result<Option<EventRecord>, EventLogError> {
        Err(refused())
    }

    async fn history(
        &self,
        _filter: &EventFilter,
        _limit: usize,
    ) -> Result<Vec<EventRecord>, EventLogError> {
        Err(refused())
    }

    async fn pending(&self) -> Result<Vec<EventRecord>, EventLogError> {
        Err(refused())
    }
}
