//! Downstream persistence traits.
//!
//! The workflow core makes no assumption about the storage engine behind
//! these traits beyond read-your-writes within one process. Each `insert`
//! enforces the record's natural uniqueness key and reports
//! [`DomainError::DuplicateRecord`] on collision, so a concurrent duplicate
//! emission fails deterministically instead of creating a second record.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::records::{
    Installation, ManufacturingOrder, ManufacturingStatus, Order, OrderStatus, Quote, QuoteStatus,
};

/// Persistence operations for quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Load a quote by its identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, DomainError>;

    /// Persist a new quote.
    async fn insert(&self, quote: &Quote) -> Result<(), DomainError>;

    /// Update a quote's lifecycle status.
    async fn set_status(&self, id: Uuid, status: QuoteStatus) -> Result<(), DomainError>;
}

/// Persistence operations for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Load an order by its identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Load the order created from a given quote, if any.
    async fn find_by_quote(&self, quote_id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Persist a new order. At most one order may exist per quote.
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;

    /// Update an order's lifecycle status.
    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError>;
}

/// Persistence operations for manufacturing orders.
#[async_trait]
pub trait ManufacturingOrderStore: Send + Sync {
    /// Load the manufacturing order for a given order, if any.
    async fn find_by_order(&self, order_id: Uuid)
    -> Result<Option<ManufacturingOrder>, DomainError>;

    /// Persist a new manufacturing order. At most one may exist per order.
    async fn insert(&self, manufacturing_order: &ManufacturingOrder) -> Result<(), DomainError>;

    /// Update a manufacturing order's lifecycle status.
    async fn set_status(&self, id: Uuid, status: ManufacturingStatus) -> Result<(), DomainError>;
}

/// Persistence operations for installations.
#[async_trait]
pub trait InstallationStore: Send + Sync {
    /// Load the installation for a given order, if any.
    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<Installation>, DomainError>;

    /// Persist a new installation. At most one may exist per order.
    async fn insert(&self, installation: &Installation) -> Result<(), DomainError>;
}
