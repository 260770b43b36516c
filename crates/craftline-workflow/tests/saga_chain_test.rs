//! End-to-end tests for the quote → order → manufacturing → installation
//! chain, driven through the bus with the full registrar wiring.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use craftline_core::records::{Deposit, OrderStatus};
use craftline_core::schedule::LeadTimeConfig;
use craftline_core::store::QuoteStore;
use craftline_event_log::{
    EventFilter, EventPayload, MANUFACTURING_COMPLETED, MemoryEventLog, ORDER_CREATED,
    ORDER_FUNDED, OrderFundedPayload, QUOTE_APPROVED, QuoteApprovedPayload,
};
use craftline_test_support::{
    FixedClock, MemoryInstallationStore, MemoryManufacturingOrderStore, MemoryOrderStore,
    MemoryQuoteStore,
};
use craftline_workflow::{EventBus, Registrar, WorkflowDeps};
use uuid::Uuid;

struct Harness {
    bus: EventBus,
    quotes: Arc<MemoryQuoteStore>,
    orders: Arc<MemoryOrderStore>,
    manufacturing_orders: Arc<MemoryManufacturingOrderStore>,
    installations: Arc<MemoryInstallationStore>,
}

fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();

    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let quotes = Arc::new(MemoryQuoteStore::new());
    let orders = Arc::new(MemoryOrderStore::new());
    let manufacturing_orders = Arc::new(MemoryManufacturingOrderStore::new());
    let installations = Arc::new(MemoryInstallationStore::new());

    let bus = EventBus::new(Arc::new(MemoryEventLog::new()), clock.clone());
    let registrar = Registrar::new();
    let bound = registrar.bind(
        &bus,
        &WorkflowDeps {
            quotes: quotes.clone(),
            orders: orders.clone(),
            manufacturing_orders: manufacturing_orders.clone(),
            installations: installations.clone(),
            clock,
            lead_times: LeadTimeConfig::default(),
        },
    );
    assert!(bound);

    Harness {
        bus,
        quotes,
        orders,
        manufacturing_orders,
        installations,
    }
}

fn approved_payload(quote_id: Uuid, customer_id: Uuid, paid: bool) -> EventPayload {
    EventPayload::QuoteApproved(QuoteApprovedPayload {
        quote_id,
        customer_id: Some(customer_id),
        total: Some(1500.0),
        deposit: Some(Deposit {
            paid,
            amount: 900.0,
        }),
        items: Vec::new(),
    })
}

#[tokio::test]
async fn test_paid_quote_approval_cascades_to_installation() {
    // Arrange
    let harness = harness();
    let quote_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4();
    let actor_id = Uuid::new_v4();

    // Act
    let record = harness
        .bus
        .emit(
            approved_payload(quote_id, customer_id, true),
            "quotes-controller",
            Some(actor_id),
        )
        .await
        .unwrap();

    // Assert: one record per stage, all linked by natural key.
    let orders = harness.orders.all();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.quote_id, quote_id);
    assert_eq!(order.total, 1500.0);
    assert_eq!(order.status, OrderStatus::InstallationScheduled);

    let manufacturing_orders = harness.manufacturing_orders.all();
    assert_eq!(manufacturing_orders.len(), 1);
    assert_eq!(manufacturing_orders[0].order_id, order.id);

    let installations = harness.installations.all();
    assert_eq!(installations.len(), 1);
    assert_eq!(installations[0].order_id, order.id);

    // The triggering record completed and carries the step outcome.
    assert!(record.processed);
    assert_eq!(record.listeners.len(), 1);
    assert_eq!(
        record.listeners[0].result.as_ref().unwrap()["action"],
        "order_created"
    );

    // History holds exactly the three stage events, newest first, with the
    // actor carried through the cascade.
    let history = harness.bus.history(&EventFilter::default(), 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].event_type, MANUFACTURING_COMPLETED);
    assert_eq!(history[1].event_type, ORDER_CREATED);
    assert_eq!(history[2].event_type, QUOTE_APPROVED);
    assert_eq!(history[0].origin, "schedule_manufacturing");
    assert_eq!(history[1].origin, "create_order_from_quote");
    assert_eq!(history[2].origin, "quotes-controller");
    for record in &history {
        assert!(record.processed);
        assert_eq!(record.actor_id, Some(actor_id));
    }

    assert!(harness.bus.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_emission_creates_nothing_new() {
    // Arrange
    let harness = harness();
    let quote_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4();
    harness
        .bus
        .emit(
            approved_payload(quote_id, customer_id, true),
            "quotes-controller",
            None,
        )
        .await
        .unwrap();
    assert_eq!(harness.orders.all().len(), 1);

    // Act: the same event is delivered a second time.
    let second = harness
        .bus
        .emit(
            approved_payload(quote_id, customer_id, true),
            "quotes-controller",
            None,
        )
        .await
        .unwrap();

    // Assert
    assert!(second.processed);
    assert_eq!(
        second.listeners[0].result.as_ref().unwrap()["action"],
        "already_exists"
    );
    assert_eq!(harness.orders.all().len(), 1);
    assert_eq!(harness.manufacturing_orders.all().len(), 1);
    assert_eq!(harness.installations.all().len(), 1);

    // Only the duplicate itself was appended; no new cascade ran.
    let history = harness.bus.history(&EventFilter::default(), 10).await.unwrap();
    assert_eq!(history.len(), 4);
}

#[tokio::test]
async fn test_unpaid_deposit_holds_chain_until_funding_event() {
    // Arrange
    let harness = harness();
    let quote_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4();

    // Act: approval with an unpaid deposit parks the chain.
    harness
        .bus
        .emit(
            approved_payload(quote_id, customer_id, false),
            "quotes-controller",
            None,
        )
        .await
        .unwrap();

    // Assert: the order exists but nothing downstream was created.
    let orders = harness.orders.all();
    assert_eq!(orders.len(), 1);
    let order_id = orders[0].id;
    assert_eq!(orders[0].status, OrderStatus::AwaitingDeposit);
    assert!(harness.manufacturing_orders.all().is_empty());
    assert!(harness.installations.all().is_empty());

    let order_created = harness
        .bus
        .history(
            &EventFilter {
                event_type: Some(ORDER_CREATED.to_owned()),
                origin: None,
            },
            10,
        )
        .await
        .unwrap();
    assert_eq!(order_created.len(), 1);
    assert_eq!(
        order_created[0].listeners[0].result.as_ref().unwrap()["action"],
        "waiting_for_payment"
    );

    // Act: the deposit arrives later.
    let funded = harness
        .bus
        .emit(
            EventPayload::OrderFunded(OrderFundedPayload {
                order_id,
                deposit: Deposit {
                    paid: true,
                    amount: 900.0,
                },
            }),
            "payments-controller",
            None,
        )
        .await
        .unwrap();

    // Assert: the chain resumes and completes.
    assert!(funded.processed);
    assert_eq!(harness.manufacturing_orders.all().len(), 1);
    assert_eq!(harness.installations.all().len(), 1);
    assert_eq!(
        harness.orders.all()[0].status,
        OrderStatus::InstallationScheduled
    );

    // quote.approved, order.created, order.funded, manufacturing.completed.
    let history = harness.bus.history(&EventFilter::default(), 10).await.unwrap();
    assert_eq!(history.len(), 4);

    let funded_again = harness
        .bus
        .emit(
            EventPayload::OrderFunded(OrderFundedPayload {
                order_id,
                deposit: Deposit {
                    paid: true,
                    amount: 900.0,
                },
            }),
            "payments-controller",
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        funded_again.listeners[0].result.as_ref().unwrap()["action"],
        "already_exists"
    );
    assert_eq!(harness.manufacturing_orders.all().len(), 1);
}

#[tokio::test]
async fn test_quote_record_is_converted_when_stored() {
    // Arrange
    let harness = harness();
    let quote_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4();
    harness
        .quotes
        .insert(&craftline_core::records::Quote {
            id: quote_id,
            customer_id,
            status: craftline_core::records::QuoteStatus::Approved,
            total: 1500.0,
            deposit: Deposit {
                paid: true,
                amount: 900.0,
            },
            items: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
        })
        .await
        .unwrap();

    // Act: a minimal payload; everything backfills from the stored quote.
    harness
        .bus
        .emit(
            EventPayload::QuoteApproved(QuoteApprovedPayload {
                quote_id,
                customer_id: None,
                total: None,
                deposit: None,
                items: Vec::new(),
            }),
            "quotes-controller",
            None,
        )
        .await
        .unwrap();

    // Assert
    let quote = harness.quotes.find_by_id(quote_id).await.unwrap().unwrap();
    assert_eq!(quote.status, craftline_core::records::QuoteStatus::Converted);
    let orders = harness.orders.all();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total, 1500.0);
    assert_eq!(orders[0].customer_id, customer_id);
}

#[tokio::test]
async fn test_unrouted_event_type_is_visible_as_pending() {
    // Arrange: a bus with no registrations at all.
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let bus = EventBus::new(Arc::new(MemoryEventLog::new()), clock);

    // Act
    let record = bus
        .emit(
            approved_payload(Uuid::new_v4(), Uuid::new_v4(), true),
            "quotes-controller",
            None,
        )
        .await
        .unwrap();

    // Assert
    assert!(!record.processed);
    assert!(record.listeners.is_empty());
    let pending = bus.pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].event_id, record.event_id);
}
