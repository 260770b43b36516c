//! Saga step: quote approved → order created.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use craftline_core::clock::Clock;
use craftline_core::error::DomainError;
use craftline_core::records::{Order, OrderStatus, QuoteStatus};
use craftline_core::store::{OrderStore, QuoteStore};
use craftline_event_log::{EventPayload, EventRecord, OrderCreatedPayload};

use crate::listener::{Listener, ListenerOutcome, Reaction};

/// Creates the order for an approved quote and advances the chain with
/// `order.created`.
pub struct CreateOrderFromQuote {
    quotes: Arc<dyn QuoteStore>,
    orders: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
}

impl CreateOrderFromQuote {
    /// Listener name, recorded on event records.
    pub const NAME: &'static str = "create_order_from_quote";

    /// Creates the step from its collaborators.
    #[must_use]
    pub fn new(
        quotes: Arc<dyn QuoteStore>,
        orders: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quotes,
            orders,
            clock,
        }
    }
}

#[async_trait]
impl Listener for CreateOrderFromQuote {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, event: &EventRecord) -> Result<Reaction, DomainError> {
        let EventPayload::QuoteApproved(payload) = &event.payload else {
            return Err(DomainError::Validation(format!(
                "{} received unexpected event type {}",
                self.name(),
                event.event_type
            )));
        };

        if let Some(existing) = self.orders.find_by_quote(payload.quote_id).await? {
            tracing::debug!(
                quote_id = %payload.quote_id,
                order_id = %existing.id,
                "order already exists for quote"
            );
            return Ok(Reaction::done(ListenerOutcome::AlreadyExists {
                id: existing.id,
            }));
        }

        // Backfill fields the producer omitted from the stored quote.
        let quote = self.quotes.find_by_id(payload.quote_id).await?;
        let Some(customer_id) = payload
            .customer_id
            .or_else(|| quote.as_ref().map(|quote| quote.customer_id))
        else {
            return Err(DomainError::Validation(format!(
                "quote {} carries no customer",
                payload.quote_id
            )));
        };
        let total = payload
            .total
            .or_else(|| quote.as_ref().map(|quote| quote.total))
            .unwrap_or(0.0);
        let deposit = payload
            .deposit
            .clone()
            .or_else(|| quote.as_ref().map(|quote| quote.deposit.clone()))
            .unwrap_or_default();
        let items = if payload.items.is_empty() {
            quote
                .as_ref()
                .map(|quote| quote.items.clone())
                .unwrap_or_default()
        } else {
            payload.items.clone()
        };

        let status = if deposit.paid {
            OrderStatus::Confirmed
        } else {
            OrderStatus::AwaitingDeposit
        };
        let order = Order {
            id: Uuid::new_v4(),
            quote_id: payload.quote_id,
            customer_id,
            status,
            total,
            deposit: deposit.clone(),
            items: items.clone(),
            created_at: self.clock.now(),
        };

        if let Err(err) = self.orders.insert(&order).await {
            return match err {
                // The natural key caught a concurrent duplicate emission.
                DomainError::DuplicateRecord { .. } => {
                    match self.orders.find_by_quote(payload.quote_id).await? {
                        Some(existing) => Ok(Reaction::done(ListenerOutcome::AlreadyExists {
                            id: existing.id,
                        })),
                        None => Err(err),
                    }
                }
                other => Err(other),
            };
        }

        if quote.is_some() {
            self.quotes
                .set_status(payload.quote_id, QuoteStatus::Converted)
                .await?;
        }

        tracing::info!(
            order_id = %order.id,
            quote_id = %payload.quote_id,
            "order created from approved quote"
        );

        Ok(Reaction::then(
            ListenerOutcome::OrderCreated { id: order.id },
            EventPayload::OrderCreated(OrderCreatedPayload {
                order_id: order.id,
                quote_id: payload.quote_id,
                customer_id,
                total,
                deposit,
                items,
            }),
        ))
    }
}
