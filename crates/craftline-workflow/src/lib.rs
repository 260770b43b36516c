//! Craftline Workflow — the event-driven orchestrator.
//!
//! A business action calls [`EventBus::emit`]; the bus persists the event,
//! invokes the registered listeners sequentially, records each outcome, and
//! performs any cascaded next-stage emission a saga step returns. The three
//! concrete steps chain quote approval through order creation, production
//! scheduling, and installation booking, each idempotent under at-least-once
//! delivery.

pub mod bus;
pub mod listener;
pub mod listeners;
pub mod registrar;

pub use bus::EventBus;
pub use listener::{Listener, ListenerOutcome, Reaction};
pub use registrar::{Registrar, WorkflowDeps};
