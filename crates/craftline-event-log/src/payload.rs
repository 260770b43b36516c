//! Typed event payloads.
//!
//! Each event type carries a compile-time-checked payload shape; the wire
//! event-type string doubles as the serde tag. Fields a producer may omit
//! default defensively (`deposit` unpaid, `items` empty) and listeners
//! backfill the rest from the stored records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use craftline_core::item::QuoteItem;
use craftline_core::records::Deposit;

/// Wire name of the quote-approval event.
pub const QUOTE_APPROVED: &str = "quote.approved";
/// Wire name of the order-creation event.
pub const ORDER_CREATED: &str = "order.created";
/// Wire name of the deposit-payment event.
pub const ORDER_FUNDED: &str = "order.funded";
/// Wire name of the manufacturing-schedule event.
pub const MANUFACTURING_COMPLETED: &str = "manufacturing.completed";

/// Payload of `quote.approved`, emitted by the quote controller.
///
/// Only the quote id is mandatory; everything else is backfilled from the
/// stored quote when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteApprovedPayload {
    /// The approved quote.
    pub quote_id: Uuid,
    /// The customer on the quote.
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    /// The quoted total.
    #[serde(default)]
    pub total: Option<f64>,
    /// Deposit terms and payment state.
    #[serde(default)]
    pub deposit: Option<Deposit>,
    /// Quoted line items.
    #[serde(default)]
    pub items: Vec<QuoteItem>,
}

/// Payload of `order.created`, emitted by the order-creation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedPayload {
    /// The newly created order.
    pub order_id: Uuid,
    /// The quote the order was created from.
    pub quote_id: Uuid,
    /// The ordering customer.
    pub customer_id: Uuid,
    /// Order total.
    pub total: f64,
    /// Deposit terms and payment state.
    #[serde(default)]
    pub deposit: Deposit,
    /// Ordered line items.
    #[serde(default)]
    pub items: Vec<QuoteItem>,
}

/// Payload of `order.funded`, emitted by the payments side when a deposit
/// is received after order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFundedPayload {
    /// The funded order.
    pub order_id: Uuid,
    /// Deposit state after the payment.
    #[serde(default)]
    pub deposit: Deposit,
}

/// Payload of `manufacturing.completed`, emitted by the manufacturing step
/// once the production schedule and its projected completion date are
/// recorded. Installation is booked against that projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingCompletedPayload {
    /// The manufacturing order.
    pub manufacturing_order_id: Uuid,
    /// The order being built.
    pub order_id: Uuid,
    /// Projected production finish.
    #[serde(default)]
    pub finishes_on: Option<NaiveDate>,
}

/// Payload variants for all workflow event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EventPayload {
    /// A quote was approved by the customer.
    #[serde(rename = "quote.approved")]
    QuoteApproved(QuoteApprovedPayload),
    /// An order was created from an approved quote.
    #[serde(rename = "order.created")]
    OrderCreated(OrderCreatedPayload),
    /// An order's deposit was paid after creation.
    #[serde(rename = "order.funded")]
    OrderFunded(OrderFundedPayload),
    /// A production schedule was recorded for an order.
    #[serde(rename = "manufacturing.completed")]
    ManufacturingCompleted(ManufacturingCompletedPayload),
}

impl EventPayload {
    /// Returns the wire event-type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            EventPayload::QuoteApproved(_) => QUOTE_APPROVED,
            EventPayload::OrderCreated(_) => ORDER_CREATED,
            EventPayload::OrderFunded(_) => ORDER_FUNDED,
            EventPayload::ManufacturingCompleted(_) => MANUFACTURING_COMPLETED,
        }
    }
}
