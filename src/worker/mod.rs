//! Per-beverage order processing.
//!
//! One [`OrderWorker`] is spawned for each beverage. Workers share the
//! [`InventoryStore`](crate::inventory::InventoryStore) and the
//! [`LowStockTracker`](crate::inventory::LowStockTracker); nothing else is shared.

pub mod order_worker;

pub use order_worker::*;
