//! The durable event record and its per-listener sub-records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::EventPayload;

/// Processing status of one listener invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerStatus {
    /// The listener has been selected but has not finished.
    Pending,
    /// The listener finished and returned an outcome.
    Processed,
    /// The listener failed; the failure is terminal (no automatic retry).
    Error,
}

/// A recorded listener failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerFailure {
    /// Human-readable failure message.
    pub message: String,
    /// Debug representation of the failure, when available.
    #[serde(default)]
    pub trace: Option<String>,
}

/// One listener invocation recorded on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerRecord {
    /// The listener's name.
    pub name: String,
    /// Current processing status.
    pub status: ListenerStatus,
    /// The listener's outcome, opaque to the log.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// The recorded failure, when `status` is [`ListenerStatus::Error`].
    #[serde(default)]
    pub error: Option<ListenerFailure>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// The unit of durable truth: one emitted event and its processing state.
///
/// Created once at emit time and mutated only by the dispatcher; never
/// deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event identifier.
    pub event_id: Uuid,
    /// Wire event-type name, denormalized from `payload` for querying.
    pub event_type: String,
    /// Typed event payload.
    pub payload: EventPayload,
    /// Name of the producer (controller or listener) that emitted the event.
    pub origin: String,
    /// The user who triggered the action, when known.
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    /// Creation time.
    pub occurred_at: DateTime<Utc>,
    /// Whether every listener entry has reached a terminal status.
    pub processed: bool,
    /// One entry per listener invoked for this event, in invocation order.
    #[serde(default)]
    pub listeners: Vec<ListenerRecord>,
}

impl EventRecord {
    /// Builds a fresh, unprocessed record for `payload`.
    #[must_use]
    pub fn new(
        payload: EventPayload,
        origin: String,
        actor_id: Option<Uuid>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: payload.event_type().to_owned(),
            payload,
            origin,
            actor_id,
            occurred_at,
            processed: false,
            listeners: Vec::new(),
        }
    }

    /// Appends a pending entry for `listener`.
    pub fn push_listener_pending(&mut self, listener: &str, at: DateTime<Utc>) {
        self.listeners.push(ListenerRecord {
            name: listener.to_owned(),
            status: ListenerStatus::Pending,
            result: None,
            error: None,
            updated_at: at,
        });
    }

    /// Moves the pending entry for `listener` to a terminal status.
    ///
    /// Returns `false` when no pending entry with that name exists.
    pub fn complete_listener_entry(
        &mut self,
        listener: &str,
        completion: crate::log::ListenerCompletion,
        at: DateTime<Utc>,
    ) -> bool {
        let Some(entry) = self
            .listeners
            .iter_mut()
            .find(|entry| entry.name == listener && entry.status == ListenerStatus::Pending)
        else {
            return false;
        };
        match completion {
            crate::log::ListenerCompletion::Processed(result) => {
                entry.status = ListenerStatus::Processed;
                entry.result = Some(result);
            }
            crate::log::ListenerCompletion::Failed(failure) => {
                entry.status = ListenerStatus::Error;
                entry.error = Some(failure);
            }
        }
        entry.updated_at = at;
        true
    }

    /// Recomputes the derived `processed` flag.
    ///
    /// True only when at least one listener ran and every entry is terminal;
    /// an event with zero listeners stays unprocessed so it remains visible
    /// as a dead-letter-like condition.
    pub fn recompute_processed(&mut self) {
        self.processed = !self.listeners.is_empty()
            && self
                .listeners
                .iter()
                .all(|entry| entry.status != ListenerStatus::Pending);
    }
}

/// Read-side filter for [`crate::EventLog::history`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Restrict to one wire event type.
    pub event_type: Option<String>,
    /// Restrict to one producer.
    pub origin: Option<String>,
}

impl EventFilter {
    /// Whether `record` passes this filter.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        self.event_type
            .as_ref()
            .is_none_or(|event_type| record.event_type == *event_type)
            && self
                .origin
                .as_ref()
                .is_none_or(|origin| record.origin == *origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::ListenerCompletion;
    use crate::payload::{EventPayload, OrderFundedPayload};
    use chrono::TimeZone;
    use craftline_core::records::Deposit;

    fn sample_record() -> EventRecord {
        EventRecord::new(
            EventPayload::OrderFunded(OrderFundedPayload {
                order_id: Uuid::new_v4(),
                deposit: Deposit {
                    paid: true,
                    amount: 500.0,
                },
            }),
            "payments-controller".to_owned(),
            None,
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_record_is_unprocessed_with_no_listeners() {
        // Act
        let record = sample_record();

        // Assert
        assert_eq!(record.event_type, "order.funded");
        assert!(!record.processed);
        assert!(record.listeners.is_empty());
    }

    #[test]
    fn test_recompute_processed_requires_all_terminal() {
        // Arrange
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let mut record = sample_record();
        record.push_listener_pending("a", at);
        record.push_listener_pending("b", at);

        // Act + Assert: one pending entry keeps the record unprocessed.
        record.complete_listener_entry(
            "a",
            ListenerCompletion::Processed(serde_json::json!({"action": "noop"})),
            at,
        );
        record.recompute_processed();
        assert!(!record.processed);

        // An errored entry is terminal.
        record.complete_listener_entry(
            "b",
            ListenerCompletion::Failed(ListenerFailure {
                message: "boom".to_owned(),
                trace: None,
            }),
            at,
        );
        record.recompute_processed();
        assert!(record.processed);
    }

    #[test]
    fn test_recompute_processed_stays_false_with_no_listeners() {
        // Arrange
        let mut record = sample_record();

        // Act
        record.recompute_processed();

        // Assert
        assert!(!record.processed);
    }

    #[test]
    fn test_complete_listener_entry_targets_pending_entry_by_name() {
        // Arrange
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let mut record = sample_record();
        record.push_listener_pending("a", at);

        // Act
        let missing = record.complete_listener_entry(
            "b",
            ListenerCompletion::Processed(serde_json::json!({})),
            at,
        );
        let found = record.complete_listener_entry(
            "a",
            ListenerCompletion::Processed(serde_json::json!({"action": "done"})),
            at,
        );

        // Assert
        assert!(!missing);
        assert!(found);
        assert_eq!(record.listeners[0].status, ListenerStatus::Processed);
        assert_eq!(
            record.listeners[0].result,
            Some(serde_json::json!({"action": "done"}))
        );
    }

    #[test]
    fn test_filter_matches_on_event_type_and_origin() {
        // Arrange
        let record = sample_record();
        let by_type = EventFilter {
            event_type: Some("order.funded".to_owned()),
            origin: None,
        };
        let by_origin = EventFilter {
            event_type: None,
            origin: Some("quotes-controller".to_owned()),
        };

        // Assert
        assert!(EventFilter::default().matches(&record));
        assert!(by_type.matches(&record));
        assert!(!by_origin.matches(&record));
    }
}
