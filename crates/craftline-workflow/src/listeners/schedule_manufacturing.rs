//! Saga step: order funded → production scheduled.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use craftline_core::clock::Clock;
use craftline_core::error::DomainError;
use craftline_core::item::BuildItem;
use craftline_core::records::{ManufacturingOrder, ManufacturingStatus, OrderStatus};
use craftline_core::schedule::LeadTimeConfig;
use craftline_core::store::{ManufacturingOrderStore, OrderStore};
use craftline_event_log::{EventPayload, EventRecord, ManufacturingCompletedPayload};

use crate::listener::{Listener, ListenerOutcome, Reaction};

/// Creates and schedules the manufacturing order once an order's deposit is
/// paid, then advances the chain with `manufacturing.completed` carrying the
/// projected finish date.
///
/// Bound to both `order.created` and `order.funded`: a deposit paid after
/// order creation re-triggers this step through the funding event.
pub struct ScheduleManufacturing {
    orders: Arc<dyn OrderStore>,
    manufacturing_orders: Arc<dyn ManufacturingOrderStore>,
    lead_times: LeadTimeConfig,
    clock: Arc<dyn Clock>,
}

impl ScheduleManufacturing {
    /// Listener name, recorded on event records.
    pub const NAME: &'static str = "schedule_manufacturing";

    /// Creates the step from its collaborators.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderStore>,
        manufacturing_orders: Arc<dyn ManufacturingOrderStore>,
        lead_times: LeadTimeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            manufacturing_orders,
            lead_times,
            clock,
        }
    }
}

#[async_trait]
impl Listener for ScheduleManufacturing {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &EventRecord) -> Result<Reaction, DomainError> {
        let (order_id, deposit) = match &event.payload {
            EventPayload::OrderCreated(payload) => (payload.order_id, payload.deposit.clone()),
            EventPayload::OrderFunded(payload) => (payload.order_id, payload.deposit.clone()),
            _ => {
                return Err(DomainError::Validation(format!(
                    "{} received unexpected event type {}",
                    self.name(),
                    event.event_type
                )));
            }
        };

        if !deposit.paid {
            tracing::debug!(order_id = %order_id, "deposit unpaid; production on hold");
            return Ok(Reaction::done(ListenerOutcome::WaitingForPayment));
        }

        if let Some(existing) = self.manufacturing_orders.find_by_order(order_id).await? {
            tracing::debug!(
                order_id = %order_id,
                manufacturing_order_id = %existing.id,
                "manufacturing order already exists"
            );
            return Ok(Reaction::done(ListenerOutcome::AlreadyExists {
                id: existing.id,
            }));
        }

        let order = self.orders.find_by_id(order_id).await?.ok_or(
            DomainError::RecordNotFound {
                kind: "order",
                id: order_id,
            },
        )?;

        // The creation event carries the line items; the funding event does
        // not, so fall back to the stored order.
        let build_items: Vec<BuildItem> = match &event.payload {
            EventPayload::OrderCreated(payload) if !payload.items.is_empty() => {
                payload.items.iter().map(BuildItem::from).collect()
            }
            _ => order.items.iter().map(BuildItem::from).collect(),
        };

        let starts_on = self.clock.now().date_naive();
        let window = self.lead_times.production_window(starts_on, &build_items);
        let manufacturing_order = ManufacturingOrder {
            id: Uuid::new_v4(),
            order_id,
            status: ManufacturingStatus::InProgress,
            items: build_items,
            starts_on: window.starts_on,
            finishes_on: window.finishes_on,
            created_at: self.clock.now(),
        };

        if let Err(err) = self.manufacturing_orders.insert(&manufacturing_order).await {
            return match err {
                DomainError::DuplicateRecord { .. } => {
                    match self.manufacturing_orders.find_by_order(order_id).await? {
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
            .set_status(order_id, OrderStatus::InProduction)
            .await?;

        tracing::info!(
            manufacturing_order_id = %manufacturing_order.id,
            order_id = %order_id,
            starts_on = %window.starts_on,
            finishes_on = %window.finishes_on,
            "production scheduled"
        );

        Ok(Reaction::then(
            ListenerOutcome::ManufacturingOrderCreated {
                id: manufacturing_order.id,
            },
            EventPayload::ManufacturingCompleted(ManufacturingCompletedPayload {
                manufacturing_order_id: manufacturing_order.id,
                order_id,
                finishes_on: Some(window.finishes_on),
            }),
        ))
    }
}
