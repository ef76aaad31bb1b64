#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Brew Reservation
//!
//! > **Concurrent beverage orders drawing from one shared ingredient stock.**
//!
//! Several workers, each preparing one beverage, reserve and consume ingredients
//! from a common inventory. The crate guarantees the bookkeeping: no ingredient
//! is ever oversold, and an order either consumes its whole recipe or nothing.
//! It makes no promise about *which* order wins a race for scarce stock.
//!
//! ## 🏗️ Design
//!
//! ### One lock per ingredient
//! Each ingredient has its own [`tokio::sync::Mutex`]. Orders that share no
//! ingredients reserve in parallel; orders that do share one queue on it.
//!
//! ### Three phases per order
//! 1. **Existence**: every ingredient in the recipe must be stocked. No locks taken.
//! 2. **Reservation**: locks are taken and *kept* while quantities cover the recipe.
//!    The first shortfall releases every lock this worker took and abandons the order.
//! 3. **Commit**: quantities are decremented under the held locks, then released.
//!
//! ### No deadlocks
//! Locks are acquired in ascending ingredient-name order, not recipe order, so
//! two orders can never each hold what the other is waiting for.
//!
//! ### Scoped release
//! A held lock is an owned [`IngredientLock`](inventory::IngredientLock); the
//! set a worker holds is a [`Reservation`](inventory::Reservation). Dropping
//! either releases exactly what it holds, in reverse acquisition order, on every
//! exit path.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Stock ([`inventory`])
//! - **Key items**: [`InventoryStore`](inventory::InventoryStore),
//!   [`Reservation`](inventory::Reservation), [`LowStockTracker`](inventory::LowStockTracker).
//!
//! ### 2. The Protocol ([`worker`])
//! - **Key items**: [`OrderWorker`](worker::OrderWorker).
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: Validates input, spawns one worker per beverage, joins them.
//! - **Key items**: [`Dispatcher`](lifecycle::Dispatcher), [`DispatcherConfig`](lifecycle::DispatcherConfig),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 4. The Data ([`model`])
//! - **Key items**: [`OrderData`](model::OrderData), [`OrderOutcome`](model::OrderOutcome),
//!   [`RunReport`](model::RunReport).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Process the bundled sample order data
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod worker;
