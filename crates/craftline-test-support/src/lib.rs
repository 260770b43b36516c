//! Shared test mocks and utilities for the Craftline workflow engine.

mod clock;
mod event_log;
mod stores;

pub use clock::FixedClock;
pub use event_log::FailingEventLog;
pub use stores::{
    MemoryInstallationStore, MemoryManufacturingOrderStore, MemoryOrderStore, MemoryQuoteStore,
};
