//! Concrete saga steps.
//!
//! Each step follows the same shape: precondition check, idempotency check
//! against the downstream store's natural key, load supporting data, derive
//! values, create the downstream record, mutate the upstream status, and
//! hand the dispatcher the next-stage event.

mod create_order;
mod schedule_installation;
mod schedule_manufacturing;

pub use create_order::CreateOrderFromQuote;
pub use schedule_installation::ScheduleInstallation;
pub use schedule_manufacturing::ScheduleManufacturing;
