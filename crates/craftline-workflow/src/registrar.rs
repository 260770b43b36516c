//! One-time binding of the saga steps to their event types.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use craftline_core::clock::Clock;
use craftline_core::schedule::LeadTimeConfig;
use craftline_core::store::{InstallationStore, ManufacturingOrderStore, OrderStore, QuoteStore};
use craftline_event_log::{MANUFACTURING_COMPLETED, ORDER_CREATED, ORDER_FUNDED, QUOTE_APPROVED};

use crate::bus::EventBus;
use crate::listener::Listener;
use crate::listeners::{CreateOrderFromQuote, ScheduleInstallation, ScheduleManufacturing};

/// The collaborators the saga steps are constructed from.
#[derive(Clone)]
pub struct WorkflowDeps {
    /// Quote persistence.
    pub quotes: Arc<dyn QuoteStore>,
    /// Order persistence.
    pub orders: Arc<dyn OrderStore>,
    /// Manufacturing order persistence.
    pub manufacturing_orders: Arc<dyn ManufacturingOrderStore>,
    /// Installation persistence.
    pub installations: Arc<dyn InstallationStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Lead-time heuristics.
    pub lead_times: LeadTimeConfig,
}

/// Binds the concrete saga steps to the bus exactly once per latch cycle.
///
/// The latch guards against overlapping startup paths registering the steps
/// twice; `reset` re-arms it for isolated tests.
#[derive(Debug, Default)]
pub struct Registrar {
    bound: AtomicBool,
}

impl Registrar {
    /// Creates an unbound registrar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the three saga steps on `bus`.
    ///
    /// Returns `false` without registering anything when already bound.
    pub fn bind(&self, bus: &EventBus, deps: &WorkflowDeps) -> bool {
        if self.bound.swap(true, Ordering::SeqCst) {
            tracing::debug!("saga steps already bound; skipping registration");
            return false;
        }

        bus.register(
            QUOTE_APPROVED,
            Arc::new(CreateOrderFromQuote::new(
                Arc::clone(&deps.quotes),
                Arc::clone(&deps.orders),
                Arc::clone(&deps.clock),
            )),
        );

        // Bound to both order events: a deposit paid after order creation
        // re-triggers the step through `order.funded`.
        let schedule_manufacturing = Arc::new(ScheduleManufacturing::new(
            Arc::clone(&deps.orders),
            Arc::clone(&deps.manufacturing_orders),
            deps.lead_times,
            Arc::clone(&deps.clock),
        ));
        bus.register(
            ORDER_CREATED,
            Arc::clone(&schedule_manufacturing) as Arc<dyn Listener>,
        );
        bus.register(ORDER_FUNDED, schedule_manufacturing);

        bus.register(
            MANUFACTURING_COMPLETED,
            Arc::new(ScheduleInstallation::new(
                Arc::clone(&deps.orders),
                Arc::clone(&deps.manufacturing_orders),
                Arc::clone(&deps.installations),
                deps.lead_times,
                Arc::clone(&deps.clock),
            )),
        );

        tracing::info!("saga steps bound to workflow events");
        true
    }

    /// Re-arms the latch so a fresh bind can run, for test isolation.
    pub fn reset(&self) {
        self.bound.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use craftline_event_log::MemoryEventLog;
    use craftline_test_support::{
        FixedClock, MemoryInstallationStore, MemoryManufacturingOrderStore, MemoryOrderStore,
        MemoryQuoteStore,
    };

    use super::*;

    fn deps() -> WorkflowDeps {
        WorkflowDeps {
            quotes: Arc::new(MemoryQuoteStore::new()),
            orders: Arc::new(MemoryOrderStore::new()),
            manufacturing_orders: Arc::new(MemoryManufacturingOrderStore::new()),
            installations: Arc::new(MemoryInstallationStore::new()),
            clock: Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            )),
            lead_times: LeadTimeConfig::default(),
        }
    }

    fn bus() -> EventBus {
        EventBus::new(
            Arc::new(MemoryEventLog::new()),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            )),
        )
    }

    #[test]
    fn test_bind_registers_each_step_once() {
        // Arrange
        let registrar = Registrar::new();
        let bus = bus();
        let deps = deps();

        // Act
        let bound = registrar.bind(&bus, &deps);

        // Assert
        assert!(bound);
        assert_eq!(
            bus.listener_names(QUOTE_APPROVED),
            vec![CreateOrderFromQuote::NAME]
        );
        assert_eq!(
            bus.listener_names(ORDER_CREATED),
            vec![ScheduleManufacturing::NAME]
        );
        assert_eq!(
            bus.listener_names(ORDER_FUNDED),
            vec![ScheduleManufacturing::NAME]
        );
        assert_eq!(
            bus.listener_names(MANUFACTURING_COMPLETED),
            vec![ScheduleInstallation::NAME]
        );
    }

    #[test]
    fn test_second_bind_is_a_latched_noop() {
        // Arrange
        let registrar = Registrar::new();
        let bus = bus();
        let deps = deps();
        assert!(registrar.bind(&bus, &deps));

        // Act
        let second = registrar.bind(&bus, &deps);

        // Assert
        assert!(!second);
        assert_eq!(bus.listener_names(QUOTE_APPROVED).len(), 1);
    }

    #[test]
    fn test_reset_rearms_the_latch() {
        // Arrange
        let registrar = Registrar::new();
        let bus = bus();
        let deps = deps();
        assert!(registrar.bind(&bus, &deps));

        // Act: a test harness resets both the latch and the bus registry.
        registrar.reset();
        bus.reset();
        let rebound = registrar.bind(&bus, &deps);

        // Assert
        assert!(rebound);
        assert_eq!(bus.listener_names(QUOTE_APPROVED).len(), 1);
    }
}
