//! Listener contract and outcome types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use craftline_core::error::DomainError;
use craftline_event_log::{EventPayload, EventRecord};

/// Outcome of one saga step invocation.
///
/// Serialized with an `action` tag and stored opaquely on the event record's
/// listener entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListenerOutcome {
    /// An order was created from an approved quote.
    OrderCreated {
        /// The new order.
        id: Uuid,
    },
    /// A manufacturing order was created and scheduled.
    ManufacturingOrderCreated {
        /// The new manufacturing order.
        id: Uuid,
    },
    /// An installation was booked.
    InstallationScheduled {
        /// The new installation.
        id: Uuid,
    },
    /// The downstream record already existed; nothing was created.
    AlreadyExists {
        /// The surviving record.
        id: Uuid,
    },
    /// The deposit is unpaid; the chain holds until funding arrives.
    WaitingForPayment,
}

impl ListenerOutcome {
    /// Serializes the outcome for opaque storage on the event record.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("ListenerOutcome serialization is infallible")
    }
}

/// What a saga step decided: its outcome, plus an optional next-stage event
/// for the dispatcher to emit on the step's behalf.
#[derive(Debug, Clone)]
pub struct Reaction {
    /// The step's terminal outcome for this event occurrence.
    pub outcome: ListenerOutcome,
    /// The next-stage event to emit, when the chain advances.
    pub follow_up: Option<EventPayload>,
}

impl Reaction {
    /// A terminal reaction that does not advance the chain.
    #[must_use]
    pub fn done(outcome: ListenerOutcome) -> Self {
        Self {
            outcome,
            follow_up: None,
        }
    }

    /// A reaction that advances the chain with `next`.
    #[must_use]
    pub fn then(outcome: ListenerOutcome, next: EventPayload) -> Self {
        Self {
            outcome,
            follow_up: Some(next),
        }
    }
}

/// A unit of work bound to one event type.
///
/// Implementations must be idempotent: before creating a downstream record
/// they check for an existing one keyed by the relevant upstream id and
/// report [`ListenerOutcome::AlreadyExists`] instead of creating a
/// duplicate. Expected business conditions (record exists, deposit unpaid)
/// are outcomes, not errors; an `Err` is recorded on the event record by the
/// dispatcher without aborting sibling listeners.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Stable listener name, recorded on the event's listener entries and
    /// used as the origin of cascaded emissions.
    fn name(&self) -> &'static str;

    /// Reacts to one event record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` for unexpected failures (store errors, records
    /// missing that the payload references).
    async fn handle(&self, event: &EventRecord) -> Result<Reaction, DomainError>;
}
