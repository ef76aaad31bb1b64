//! Error types for the inventory store.

use thiserror::Error;

/// Errors that can occur while accessing ingredient cells.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The ingredient is not stocked. Workers check existence before acquiring,
    /// so this only surfaces through direct use of the store.
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),
}
