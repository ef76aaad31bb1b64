//! # Inventory Store
//!
//! Holds one quantity cell per ingredient, each behind its own
//! [`tokio::sync::Mutex`]. A single global lock would serialize every order;
//! with one lock per ingredient, orders that share no ingredients reserve in
//! parallel.
//!
//! Access is only ever handed out as an [`IngredientLock`], which owns the
//! mutex guard. Dropping it (or calling [`IngredientLock::release`]) releases
//! exactly that lock, so a worker can never release a lock someone else holds.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

use super::InventoryError;
use crate::model::Quantity;

/// Shared per-ingredient stock.
///
/// The set of ingredients is fixed at construction; only quantities change.
pub struct InventoryStore {
    cells: BTreeMap<String, Arc<Mutex<Quantity>>>,
}

impl InventoryStore {
    /// Creates a store with the given initial quantities.
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = (S, Quantity)>,
        S: Into<String>,
    {
        let cells = initial
            .into_iter()
            .map(|(ingredient, quantity)| (ingredient.into(), Arc::new(Mutex::new(quantity))))
            .collect();
        Self { cells }
    }

    /// Returns true if the ingredient is stocked (regardless of quantity).
    pub fn contains(&self, ingredient: &str) -> bool {
        self.cells.contains_key(ingredient)
    }

    /// Number of stocked ingredients.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Waits until the ingredient's lock is free and takes it.
    ///
    /// There is no timeout: a contended ingredient parks the caller until the
    /// current holder releases it.
    ///
    /// # Errors
    ///
    /// [`InventoryError::UnknownIngredient`] if the ingredient is not stocked.
    pub async fn acquire(&self, ingredient: &str) -> Result<IngredientLock, InventoryError> {
        let cell = self
            .cells
            .get(ingredient)
            .ok_or_else(|| InventoryError::UnknownIngredient(ingredient.to_string()))?;

        let guard = Arc::clone(cell).lock_owned().await;
        trace!(ingredient, quantity = *guard, "Lock acquired");

        Ok(IngredientLock {
            ingredient: ingredient.to_string(),
            guard,
        })
    }

    /// Current quantity of one ingredient, taking its lock briefly.
    pub async fn quantity(&self, ingredient: &str) -> Option<Quantity> {
        let cell = self.cells.get(ingredient)?;
        let quantity = *cell.lock().await;
        Some(quantity)
    }

    /// Copies every quantity.
    ///
    /// Locks are taken one at a time in ingredient order, so a snapshot taken
    /// while workers run never deadlocks with them but may mix states from
    /// before and after a commit.
    pub async fn snapshot(&self) -> BTreeMap<String, Quantity> {
        let mut quantities = BTreeMap::new();
        for (ingredient, cell) in &self.cells {
            quantities.insert(ingredient.clone(), *cell.lock().await);
        }
        quantities
    }
}

impl fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryStore")
            .field("ingredients", &self.cells.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Exclusive access to one ingredient's quantity.
///
/// The lock is held for as long as this value lives.
pub struct IngredientLock {
    ingredient: String,
    guard: OwnedMutexGuard<Quantity>,
}

impl IngredientLock {
    pub fn ingredient(&self) -> &str {
        &self.ingredient
    }

    /// Reads the quantity under the held lock.
    pub fn peek(&self) -> Quantity {
        *self.guard
    }

    /// Overwrites the quantity under the held lock.
    pub fn commit(&mut self, quantity: Quantity) {
        trace!(ingredient = %self.ingredient, from = *self.guard, to = quantity, "Commit");
        *self.guard = quantity;
    }

    /// Releases the lock.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for IngredientLock {
    fn drop(&mut self) {
        trace!(ingredient = %self.ingredient, "Lock released");
    }
}

impl fmt::Debug for IngredientLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngredientLock")
            .field("ingredient", &self.ingredient)
            .field("quantity", &*self.guard)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn store() -> InventoryStore {
        InventoryStore::new([("hot_water", 500), ("hot_milk", 100)])
    }

    #[tokio::test]
    async fn test_acquire_peek_commit() {
        let store = store();

        let mut lock = store.acquire("hot_water").await.unwrap();
        assert_eq!(lock.ingredient(), "hot_water");
        assert_eq!(lock.peek(), 500);
        lock.commit(300);
        assert_eq!(lock.peek(), 300);
        lock.release();

        assert_eq!(store.quantity("hot_water").await, Some(300));
        assert_eq!(store.quantity("hot_milk").await, Some(100));
        assert_eq!(store.quantity("sugar").await, None);
    }

    #[tokio::test]
    async fn test_acquire_unknown_ingredient() {
        let store = store();
        let err = store.acquire("green_mixture").await.unwrap_err();
        assert_eq!(err, InventoryError::UnknownIngredient("green_mixture".into()));
        assert!(!store.contains("green_mixture"));
        assert!(store.contains("hot_milk"));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive_until_released() {
        let store = Arc::new(store());
        let held = store.acquire("hot_milk").await.unwrap();

        // A second acquirer parks while the first lock is held.
        let contender = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.acquire("hot_milk").await.map(|lock| lock.peek()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        // An unrelated ingredient is still available.
        let other = timeout(Duration::from_secs(1), store.acquire("hot_water"))
            .await
            .expect("unrelated ingredient should not be blocked")
            .unwrap();
        drop(other);

        held.release();
        let quantity = timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap()
            .unwrap();
        assert_eq!(quantity, 100);
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted_copy() {
        let store = store();
        let snapshot = store.snapshot().await;
        let names: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(names, ["hot_milk", "hot_water"]);
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
