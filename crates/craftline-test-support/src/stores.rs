//! In-memory downstream stores.
//!
//! Each store enforces its record's natural uniqueness key at insert time
//! the way a database unique index would, reporting
//! `DomainError::DuplicateRecord` on collision.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use craftline_core::error::DomainError;
use craftline_core::records::{
    Installation, ManufacturingOrder, ManufacturingStatus, Order, OrderStatus, Quote, QuoteStatus,
};
use craftline_core::store::{InstallationStore, ManufacturingOrderStore, OrderStore, QuoteStore};
use uuid::Uuid;

/// An in-memory quote store.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: Mutex<HashMap<Uuid, Quote>>,
}

impl MemoryQuoteStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all stored quotes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Quote> {
        self.quotes.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, DomainError> {
        Ok(self.quotes.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, quote: &Quote) -> Result<(), DomainError> {
        let mut quotes = self.quotes.lock().unwrap();
        if quotes.contains_key(&quote.id) {
            return Err(DomainError::DuplicateRecord {
                kind: "quote",
                key_field: "id",
                key: quote.id,
            });
        }
        quotes.insert(quote.id, quote.clone());
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: QuoteStatus) -> Result<(), DomainError> {
        let mut quotes = self.quotes.lock().unwrap();
        let quote = quotes.get_mut(&id).ok_or(DomainError::RecordNotFound {
            kind: "quote",
            id,
        })?;
        quote.status = status;
        Ok(())
    }
}

/// An in-memory order store enforcing one order per quote.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryOrderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all stored orders.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_quote(&self, quote_id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .find(|order| order.quote_id == quote_id)
            .cloned())
    }

    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        if orders.values().any(|existing| existing.quote_id == order.quote_id) {
            return Err(DomainError::DuplicateRecord {
                kind: "order",
                key_field: "quote_id",
                key: order.quote_id,
            });
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(&id).ok_or(DomainError::RecordNotFound {
            kind: "order",
            id,
        })?;
        order.status = status;
        Ok(())
    }
}

/// An in-memory manufacturing order store enforcing one per order.
#[derive(Debug, Default)]
pub struct MemoryManufacturingOrderStore {
    manufacturing_orders: Mutex<HashMap<Uuid, ManufacturingOrder>>,
}

impl MemoryManufacturingOrderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all stored manufacturing orders.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<ManufacturingOrder> {
        self.manufacturing_orders
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ManufacturingOrderStore for MemoryManufacturingOrderStore {
    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<ManufacturingOrder>, DomainError> {
        Ok(self
            .manufacturing_orders
            .lock()
            .unwrap()
            .values()
            .find(|mo| mo.order_id == order_id)
            .cloned())
    }

    async fn insert(&self, manufacturing_order: &ManufacturingOrder) -> Result<(), DomainError> {
        let mut manufacturing_orders = self.manufacturing_orders.lock().unwrap();
        if manufacturing_orders
            .values()
            .any(|existing| existing.order_id == manufacturing_order.order_id)
        {
            return Err(DomainError::DuplicateRecord {
                kind: "manufacturing order",
                key_field: "order_id",
                key: manufacturing_order.order_id,
            });
        }
        manufacturing_orders.insert(manufacturing_order.id, manufacturing_order.clone());
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: ManufacturingStatus) -> Result<(), DomainError> {
        let mut manufacturing_orders = self.manufacturing_orders.lock().unwrap();
        let manufacturing_order =
            manufacturing_orders
                .get_mut(&id)
                .ok_or(DomainError::RecordNotFound {
                    kind: "manufacturing order",
                    id,
                })?;
        manufacturing_order.status = status;
        Ok(())
    }
}

/// An in-memory installation store enforcing one per order.
#[derive(Debug, Default)]
pub struct MemoryInstallationStore {
    installations: Mutex<HashMap<Uuid, Installation>>,
}

impl MemoryInstallationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all stored installations.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Installation> {
        self.installations
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InstallationStore for MemoryInstallationStore {
    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<Installation>, DomainError> {
        Ok(self
            .installations
            .lock()
            .unwrap()
            .values()
            .find(|installation| installation.order_id == order_id)
            .cloned())
    }

    async fn insert(&self, installation: &Installation) -> Result<(), DomainError> {
        let mut installations = self.installations.lock().unwrap();
        if installations
            .values()
            .any(|existing| existing.order_id == installation.order_id)
        {
            return Err(DomainError::DuplicateRecord {
                kind: "installation",
                key_field: "order_id",
                key: installation.order_id,
            });
        }
        installations.insert(installation.id, installation.clone());
        Ok(())
    }
}
