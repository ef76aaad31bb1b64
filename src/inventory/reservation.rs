//! # Reservations
//!
//! A [`Reservation`] is the set of ingredient locks one worker has acquired,
//! each paired with the amount it intends to consume. Locks enter the
//! reservation only once the held quantity covers the requirement, and they
//! stay held until the reservation is committed or released.
//!
//! Release always walks the locks in reverse acquisition order. This also
//! happens on drop, so an early return or a panic inside a worker cannot leave
//! a lock behind.

use tracing::debug;

use super::IngredientLock;
use crate::model::Quantity;

/// One held lock and the amount it was claimed for.
#[derive(Debug)]
pub struct Claim {
    lock: IngredientLock,
    required: Quantity,
}

impl Claim {
    pub fn ingredient(&self) -> &str {
        self.lock.ingredient()
    }

    pub fn required(&self) -> Quantity {
        self.required
    }

    pub fn available(&self) -> Quantity {
        self.lock.peek()
    }

    /// Writes the remaining quantity back and returns it.
    fn settle(&mut self) -> Quantity {
        // The claim was checked against this same held lock, so this cannot underflow.
        let remaining = self.lock.peek() - self.required;
        self.lock.commit(remaining);
        remaining
    }
}

/// The locks held by a single worker, in acquisition order.
#[derive(Debug, Default)]
pub struct Reservation {
    claims: Vec<Claim>,
}

impl Reservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a held lock to the reservation if its quantity covers `required`.
    ///
    /// # Errors
    ///
    /// Hands the lock back unchanged when the quantity is too low, so the
    /// caller can inspect it before letting it go.
    pub fn claim(&mut self, lock: IngredientLock, required: Quantity) -> Result<(), IngredientLock> {
        if lock.peek() < required {
            return Err(lock);
        }
        self.claims.push(Claim { lock, required });
        Ok(())
    }

    /// Number of locks currently held.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Consumes every claimed amount, then releases all locks.
    ///
    /// `on_settled` is called with each ingredient and its remaining quantity
    /// while that ingredient's lock is still held.
    pub fn commit(mut self, mut on_settled: impl FnMut(&str, Quantity)) {
        for claim in &mut self.claims {
            let remaining = claim.settle();
            on_settled(claim.ingredient(), remaining);
        }
        self.release();
    }

    /// Releases every held lock, most recently acquired first.
    ///
    /// Returns how many locks were released.
    pub fn release(mut self) -> usize {
        self.release_held()
    }

    fn release_held(&mut self) -> usize {
        let count = self.claims.len();
        while let Some(claim) = self.claims.pop() {
            claim.lock.release();
        }
        if count > 0 {
            debug!(count, "Released reservation");
        }
        count
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.release_held();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn store() -> Arc<InventoryStore> {
        Arc::new(InventoryStore::new([
            ("ginger_syrup", 30),
            ("hot_milk", 100),
            ("tea_leaves_syrup", 10),
        ]))
    }

    async fn is_free(store: &InventoryStore, ingredient: &str) -> bool {
        timeout(Duration::from_millis(200), store.acquire(ingredient))
            .await
            .is_ok()
    }

    #[tokio::test]
    async fn test_claim_rejects_short_quantity() {
        let store = store();
        let mut reservation = Reservation::new();

        let lock = store.acquire("tea_leaves_syrup").await.unwrap();
        let rejected = reservation.claim(lock, 30).unwrap_err();
        assert_eq!(rejected.ingredient(), "tea_leaves_syrup");
        assert_eq!(rejected.peek(), 10);
        assert!(reservation.is_empty());
    }

    #[tokio::test]
    async fn test_commit_writes_and_releases() {
        let store = store();
        let mut reservation = Reservation::new();

        let milk = store.acquire("hot_milk").await.unwrap();
        reservation.claim(milk, 100).unwrap();
        let ginger = store.acquire("ginger_syrup").await.unwrap();
        reservation.claim(ginger, 10).unwrap();
        assert_eq!(reservation.len(), 2);

        let claimed: Vec<(&str, Quantity, Quantity)> = reservation
            .claims()
            .map(|claim| (claim.ingredient(), claim.available(), claim.required()))
            .collect();
        assert_eq!(claimed, [("hot_milk", 100, 100), ("ginger_syrup", 30, 10)]);

        let mut settled = Vec::new();
        reservation.commit(|ingredient, remaining| settled.push((ingredient.to_string(), remaining)));
        assert_eq!(
            settled,
            [("hot_milk".to_string(), 0), ("ginger_syrup".to_string(), 20)]
        );

        assert!(is_free(&store, "hot_milk").await);
        assert!(is_free(&store, "ginger_syrup").await);
        assert_eq!(store.quantity("hot_milk").await, Some(0));
        assert_eq!(store.quantity("ginger_syrup").await, Some(20));
    }

    #[tokio::test]
    async fn test_release_and_drop_leave_quantities_untouched() {
        let store = store();

        let mut reservation = Reservation::new();
        reservation
            .claim(store.acquire("hot_milk").await.unwrap(), 50)
            .unwrap();
        reservation
            .claim(store.acquire("ginger_syrup").await.unwrap(), 5)
            .unwrap();
        assert_eq!(reservation.release(), 2);
        assert!(is_free(&store, "hot_milk").await);

        {
            let mut dropped = Reservation::new();
            dropped
                .claim(store.acquire("ginger_syrup").await.unwrap(), 5)
                .unwrap();
        }
        assert!(is_free(&store, "ginger_syrup").await);

        assert_eq!(store.quantity("hot_milk").await, Some(100));
        assert_eq!(store.quantity("ginger_syrup").await, Some(30));
    }
}
