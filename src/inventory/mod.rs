//! Shared ingredient stock and the bookkeeping around it.
//!
//! # Main Components
//!
//! - [`InventoryStore`] - One quantity cell and one exclusive lock per ingredient
//! - [`IngredientLock`] - Exclusive access to one cell, released when dropped
//! - [`Reservation`] - The locks a single worker holds, released in reverse order
//! - [`LowStockTracker`] - Last observed insufficient or exhausted quantity per ingredient

pub mod error;
pub mod low_stock;
pub mod reservation;
pub mod store;

pub use error::*;
pub use low_stock::*;
pub use reservation::*;
pub use store::*;
