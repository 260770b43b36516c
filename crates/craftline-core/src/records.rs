//! Business record types.
//!
//! These are the four record types the workflow orchestrator creates and
//! mutates. They are plain documents behind the store traits in
//! [`crate::store`]; the event log holds no foreign keys to them — the
//! correlation is the natural key each downstream record carries
//! (quote id on an order, order id on a manufacturing order and an
//! installation).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{BuildItem, QuoteItem};

/// A partial upfront payment attached to a quote or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    /// Whether the deposit has been received.
    pub paid: bool,
    /// Deposit amount.
    pub amount: f64,
}

impl Default for Deposit {
    fn default() -> Self {
        Self {
            paid: false,
            amount: 0.0,
        }
    }
}

/// Lifecycle of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Being drafted, not yet sent to the customer.
    Draft,
    /// Sent to the customer, awaiting a decision.
    Sent,
    /// Approved by the customer; entry condition for the workflow.
    Approved,
    /// Converted into an order.
    Converted,
}

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created from an approved quote, deposit outstanding.
    AwaitingDeposit,
    /// Deposit received, ready for production scheduling.
    Confirmed,
    /// A manufacturing order exists for it.
    InProduction,
    /// Installation has been booked.
    InstallationScheduled,
    /// Delivered and installed.
    Completed,
}

/// Lifecycle of a manufacturing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingStatus {
    /// On the shop floor.
    InProgress,
    /// Fabrication finished.
    Completed,
}

/// Lifecycle of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationStatus {
    /// Booked for a date.
    Scheduled,
    /// Carried out on site.
    Completed,
}

/// A priced proposal sent to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote identifier.
    pub id: Uuid,
    /// The customer the quote was sent to.
    pub customer_id: Uuid,
    /// Current lifecycle status.
    pub status: QuoteStatus,
    /// Quoted total.
    pub total: f64,
    /// Deposit terms and payment state.
    #[serde(default)]
    pub deposit: Deposit,
    /// Quoted line items.
    #[serde(default)]
    pub items: Vec<QuoteItem>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The confirmed commitment created once a quote is approved.
///
/// Natural key: at most one order exists per `quote_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: Uuid,
    /// The quote this order was created from.
    pub quote_id: Uuid,
    /// The ordering customer.
    pub customer_id: Uuid,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Order total, carried over from the quote.
    pub total: f64,
    /// Deposit terms and payment state.
    #[serde(default)]
    pub deposit: Deposit,
    /// Ordered line items.
    #[serde(default)]
    pub items: Vec<QuoteItem>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The production work item created once an order is ready to be built.
///
/// Natural key: at most one manufacturing order exists per `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingOrder {
    /// Manufacturing order identifier.
    pub id: Uuid,
    /// The order being built.
    pub order_id: Uuid,
    /// Current lifecycle status.
    pub status: ManufacturingStatus,
    /// Items to build, pricing stripped.
    #[serde(default)]
    pub items: Vec<BuildItem>,
    /// Scheduled production start.
    pub starts_on: NaiveDate,
    /// Projected production finish.
    pub finishes_on: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// The on-site delivery and setup work item.
///
/// Natural key: at most one installation exists per `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// Installation identifier.
    pub id: Uuid,
    /// The order being installed.
    pub order_id: Uuid,
    /// Current lifecycle status.
    pub status: InstallationStatus,
    /// Booked installation date.
    pub scheduled_on: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
