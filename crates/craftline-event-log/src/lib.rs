//! Craftline Event Log — durable record of workflow events.
//!
//! Every business-stage transition is appended here as an [`EventRecord`]
//! before any listener runs, and each listener's outcome is written back to
//! the record as it reaches a terminal status. The log is the operational
//! source of truth for what the workflow engine did and what is still
//! outstanding; it holds no foreign keys to the business records it causes
//! to be created.

mod log;
mod memory;
mod payload;
mod pg;
mod record;
pub mod schema;

pub use log::{EventLog, EventLogError, ListenerCompletion};
pub use memory::MemoryEventLog;
pub use payload::{
    EventPayload, MANUFACTURING_COMPLETED, ManufacturingCompletedPayload, ORDER_CREATED,
    ORDER_FUNDED, OrderCreatedPayload, OrderFundedPayload, QUOTE_APPROVED, QuoteApprovedPayload,
};
pub use pg::PgEventLog;
pub use record::{EventFilter, EventRecord, ListenerFailure, ListenerRecord, ListenerStatus};
