//! Saga step: production scheduled → installation booked.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use craftline_core::clock::Clock;
use craftline_core::error::DomainError;
use craftline_core::records::{Installation, InstallationStatus, OrderStatus};
use craftline_core::schedule::LeadTimeConfig;
use craftline_core::store::{InstallationStore, ManufacturingOrderStore, OrderStore};
use craftline_event_log::{EventPayload, EventRecord};

use crate::listener::{Listener, ListenerOutcome, Reaction};

/// Books the on-site installation against the projected production finish
/// date. Terminal step of the chain: no follow-up event.
pub struct ScheduleInstallation {
    orders: Arc<dyn OrderStore>,
    manufacturing_orders: Arc<dyn ManufacturingOrderStore>,
    installations: Arc<dyn InstallationStore>,
    lead_times: LeadTimeConfig,
    clock: Arc<dyn Clock>,
}

impl ScheduleInstallation {
    /// Listener name, recorded on event records.
    pub const NAME: &'static str = "schedule_installation";

    /// Creates the step from its collaborators.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderStore>,
        manufacturing_orders: Arc<dyn ManufacturingOrderStore>,
        installations: Arc<dyn InstallationStore>,
        lead_times: LeadTimeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            manufacturing_orders,
            installations,
            lead_times,
            clock,
        }
    }
}

#[async_trait]
impl Listener for ScheduleInstallation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &EventRecord) -> Result<Reaction, DomainError> {
        let EventPayload::ManufacturingCompleted(payload) = &event.payload else {
            return Err(DomainError::Validation(format!(
                "{} received unexpected event type {}",
                self.name(),
                event.event_type
            )));
        };

        if let Some(existing) = self.installations.find_by_order(payload.order_id).await? {
            tracing::debug!(
                order_id = %payload.order_id,
                installation_id = %existing.id,
                "installation already booked"
            );
            return Ok(Reaction::done(ListenerOutcome::AlreadyExists {
                id: existing.id,
            }));
        }

        // Resolve the finish date: payload, else the stored manufacturing
        // order, else today.
        let finishes_on = match payload.finishes_on {
            Some(date) => date,
            None => self
                .manufacturing_orders
                .find_by_order(payload.order_id)
                .await?
                .map_or_else(
                    || self.clock.now().date_naive(),
                    |manufacturing_order| manufacturing_order.finishes_on,
                ),
        };

        let installation = Installation {
            id: Uuid::new_v4(),
            order_id: payload.order_id,
            status: InstallationStatus::Scheduled,
            scheduled_on: self.lead_times.installation_date(finishes_on),
            created_at: self.clock.now(),
        };

        if let Err(err) = self.installations.insert(&installation).await {
            return match err {
                DomainError::DuplicateRecord { .. } => {
                    match self.installations.find_by_order(payload.order_id).await? {
                        Some(existing) => Ok(Reaction::done(ListenerOutcome::AlreadyExists {
                            id: existing.id,
                        })),
                        None => Err(err),
                    }
                }
                other => Err(other),
            };
        }

        self.orders
            .set_status(payload.order_id, OrderStatus::InstallationScheduled)
            .await?;

        tracing::info!(
            installation_id = %installation.id,
            order_id = %payload.order_id,
            scheduled_on = %installation.scheduled_on,
            "installation booked"
        );

        Ok(Reaction::done(ListenerOutcome::InstallationScheduled {
            id: installation.id,
        }))
    }
}
