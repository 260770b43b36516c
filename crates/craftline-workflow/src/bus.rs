//! Event dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use craftline_core::clock::Clock;
use craftline_core::error::DomainError;
use craftline_event_log::{
    EventFilter, EventLog, EventLogError, EventPayload, EventRecord, ListenerCompletion,
    ListenerFailure,
};

use crate::listener::{Listener, ListenerOutcome, Reaction};

type DispatchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<EventRecord, EventLogError>> + Send + 'a>>;

/// Routes events to listeners and tracks outcomes on the event log.
///
/// Constructed once at startup and shared by dependency injection. The
/// registry maps each event type to its listeners in registration order;
/// listeners for one event run sequentially, and one listener's failure
/// never prevents the remaining listeners from running.
pub struct EventBus {
    log: Arc<dyn EventLog>,
    clock: Arc<dyn Clock>,
    registry: RwLock<HashMap<String, Vec<Arc<dyn Listener>>>>,
}

impl EventBus {
    /// Creates a bus with no registered listeners.
    #[must_use]
    pub fn new(log: Arc<dyn EventLog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            log,
            clock,
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `listener` for `event_type`, after any existing listeners.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn register(&self, event_type: &str, listener: Arc<dyn Listener>) {
        tracing::debug!(event_type, listener = listener.name(), "listener registered");
        self.registry
            .write()
            .unwrap()
            .entry(event_type.to_owned())
            .or_default()
            .push(listener);
    }

    /// Names of the listeners registered for `event_type`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    #[must_use]
    pub fn listener_names(&self, event_type: &str) -> Vec<&'static str> {
        self.registry
            .read()
            .unwrap()
            .get(event_type)
            .map(|listeners| listeners.iter().map(|listener| listener.name()).collect())
            .unwrap_or_default()
    }

    /// Clears all registrations, for test isolation.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock is poisoned.
    pub fn reset(&self) {
        self.registry.write().unwrap().clear();
    }

    /// Persists `payload` as a new event record and dispatches it to the
    /// registered listeners.
    ///
    /// Listener failures are recorded on the returned record, not surfaced
    /// here; an event type with no listeners is logged and left unprocessed
    /// (visible via [`EventBus::pending`]).
    ///
    /// # Errors
    ///
    /// Returns `EventLogError` only when the log itself fails — appending
    /// the record aborts the call before any listener runs, and bookkeeping
    /// writes abort the remaining dispatch.
    pub async fn emit(
        &self,
        payload: EventPayload,
        origin: &str,
        actor_id: Option<Uuid>,
    ) -> Result<EventRecord, EventLogError> {
        self.dispatch(payload, origin.to_owned(), actor_id).await
    }

    /// Read access to dispatch history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EventLogError` when the log read fails.
    pub async fn history(
        &self,
        filter: &EventFilter,
        limit: usize,
    ) -> Result<Vec<EventRecord>, EventLogError> {
        self.log.history(filter, limit).await
    }

    /// All events that have not reached a terminal processing state.
    ///
    /// # Errors
    ///
    /// Returns `EventLogError` when the log read fails.
    pub async fn pending(&self) -> Result<Vec<EventRecord>, EventLogError> {
        self.log.pending().await
    }

    // Boxed for the recursive cascade: a saga step's follow-up re-enters
    // dispatch before the step's terminal status is recorded.
    fn dispatch(
        &self,
        payload: EventPayload,
        origin: String,
        actor_id: Option<Uuid>,
    ) -> DispatchFuture<'_> {
        Box::pin(async move {
            let record = EventRecord::new(payload, origin, actor_id, self.clock.now());
            let event_type = record.event_type.clone();
            let mut record = self.log.append(record).await?;

            let bound = {
                let registry = self.registry.read().unwrap();
                registry.get(&event_type).cloned().unwrap_or_default()
            };
            if bound.is_empty() {
                tracing::warn!(
                    event_type = %event_type,
                    event_id = %record.event_id,
                    "no listeners registered; event left unprocessed"
                );
                return Ok(record);
            }

            for listener in bound {
                record = self
                    .log
                    .mark_listener_pending(record.event_id, listener.name(), self.clock.now())
                    .await?;
                let completion = match self.run_step(listener.as_ref(), &record, actor_id).await {
                    Ok(outcome) => {
                        tracing::debug!(
                            event_id = %record.event_id,
                            listener = listener.name(),
                            "listener processed"
                        );
                        ListenerCompletion::Processed(outcome.to_value())
                    }
                    Err(err) => {
                        tracing::error!(
                            event_id = %record.event_id,
                            listener = listener.name(),
                            error = %err,
                            "listener failed; continuing with remaining listeners"
                        );
                        ListenerCompletion::Failed(ListenerFailure {
                            message: err.to_string(),
                            trace: Some(format!("{err:?}")),
                        })
                    }
                };
                record = self
                    .log
                    .complete_listener(record.event_id, listener.name(), completion, self.clock.now())
                    .await?;
            }

            self.log.recompute_processed(record.event_id).await
        })
    }

    /// Runs one listener and, on success, performs its cascaded emission.
    ///
    /// The cascade completes before the listener's terminal status is
    /// recorded, so a failure anywhere downstream is recorded as this
    /// listener's error — the chain is strictly sequential end-to-end.
    async fn run_step(
        &self,
        listener: &dyn Listener,
        record: &EventRecord,
        actor_id: Option<Uuid>,
    ) -> Result<ListenerOutcome, DomainError> {
        let Reaction { outcome, follow_up } = listener.handle(record).await?;
        if let Some(next) = follow_up {
            self.dispatch(next, listener.name().to_owned(), actor_id)
                .await
                .map_err(|err| {
                    DomainError::Infrastructure(format!("cascaded emit failed: {err}"))
                })?;
        }
        Ok(outcome)
    }
}
