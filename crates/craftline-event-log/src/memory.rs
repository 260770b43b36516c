//! In-memory event log.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::log::{EventLog, EventLogError, ListenerCompletion};
use crate::record::{EventFilter, EventRecord};

/// An event log held in process memory, in append order.
///
/// Suitable for deployments that accept losing dispatch history on restart
/// and for tests; [`crate::PgEventLog`] is the durable implementation.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    records: Mutex<Vec<EventRecord>>,
}

impl MemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_record<T>(
        &self,
        event_id: Uuid,
        mutate: impl FnOnce(&mut EventRecord) -> Result<T, EventLogError>,
    ) -> Result<T, EventLogError> {
        let mut records = self.records.lock().expect("event log lock poisoned");
        let record = records
            .iter_mut()
            .find(|record| record.event_id == event_id)
            .ok_or(EventLogError::EventNotFound(event_id))?;
        mutate(record)
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn append(&self, record: EventRecord) -> Result<EventRecord, EventLogError> {
        let mut records = self.records.lock().expect("event log lock poisoned");
        records.push(record.clone());
        Ok(record)
    }

    async fn mark_listener_pending(
        &self,
        event_id: Uuid,
        listener: &str,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        self.with_record(event_id, |record| {
            record.push_listener_pending(listener, at);
            Ok(record.clone())
        })
    }

    async fn complete_listener(
        &self,
        event_id: Uuid,
        listener: &str,
        completion: ListenerCompletion,
        at: DateTime<Utc>,
    ) -> Result<EventRecord, EventLogError> {
        self.with_record(event_id, |record| {
            if record.complete_listener_entry(listener, completion, at) {
                Ok(record.clone())
            } else {
                Err(EventLogError::ListenerEntryMissing {
                    event_id,
                    listener: listener.to_owned(),
                })
            }
        })
    }

    async fn recompute_processed(&self, event_id: Uuid) -> Result<EventRecord, EventLogError> {
        self.with_record(event_id, |record| {
            record.recompute_processed();
            Ok(record.clone())
        })
    }

    async fn find_by_id(&self, event_id: Uuid) -> Result<Option<EventRecord>, EventLogError> {
        let records = self.records.lock().expect("event log lock poisoned");
        Ok(records
            .iter()
            .find(|record| record.event_id == event_id)
            .cloned())
    }

    async fn history(
        &self,
        filter: &EventFilter,
        limit: usize,
    ) -> Result<Vec<EventRecord>, EventLogError> {
        let records = self.records.lock().expect("event log lock poisoned");
        Ok(records
            .iter()
            .rev()
            .filter(|record| filter.matches(record))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn pending(&self) -> Result<Vec<EventRecord>, EventLogError> {
        let records = self.records.lock().expect("event log lock poisoned");
        Ok(records
            .iter()
            .filter(|record| !record.processed)
            .cloned()
            .collect())
    }
}
