//! Low-stock indicator shared by all workers.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::model::Quantity;

/// Last observed insufficient or exhausted quantity per ingredient.
///
/// Writes overwrite; when two workers record the same ingredient at the same
/// time either value may survive. Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct LowStockTracker {
    entries: Arc<RwLock<HashMap<String, Quantity>>>,
}

impl LowStockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the tracked quantity for `ingredient`.
    pub fn record(&self, ingredient: &str, quantity: Quantity) {
        debug!(ingredient, quantity, "Low stock");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ingredient.to_string(), quantity);
    }

    pub fn get(&self, ingredient: &str) -> Option<Quantity> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ingredient)
            .copied()
    }

    /// Copies the full mapping as it is right now.
    pub fn snapshot(&self) -> BTreeMap<String, Quantity> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(ingredient, quantity)| (ingredient.clone(), *quantity))
            .collect()
    }
}
