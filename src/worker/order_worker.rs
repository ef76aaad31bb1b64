use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::inventory::{InventoryStore, LowStockTracker, Reservation};
use crate::model::{OrderOutcome, Quantity, Recipe};

/// Prepares one beverage against the shared inventory.
///
/// A worker runs once and emits exactly one [`OrderOutcome`]. It holds no locks
/// after [`OrderWorker::run`] returns, whichever way the order ended.
#[derive(Debug)]
pub struct OrderWorker {
    beverage: String,
    recipe: Recipe,
    store: Arc<InventoryStore>,
    low_stock: LowStockTracker,
}

impl OrderWorker {
    pub fn new(
        beverage: impl Into<String>,
        recipe: Recipe,
        store: Arc<InventoryStore>,
        low_stock: LowStockTracker,
    ) -> Self {
        Self {
            beverage: beverage.into(),
            recipe,
            store,
            low_stock,
        }
    }

    pub fn beverage(&self) -> &str {
        &self.beverage
    }

    /// Runs the reservation protocol to completion.
    ///
    /// 1. **Existence**: every ingredient must be stocked. Nothing is locked.
    /// 2. **Reservation**: locks are taken one by one and kept while the held
    ///    quantity covers the requirement. The first shortfall is recorded as
    ///    low stock and every lock taken so far is released.
    /// 3. **Commit**: every claimed amount is consumed under the held locks,
    ///    exhausted ingredients are recorded as low stock, then all locks are
    ///    released.
    #[instrument(name = "order", skip(self), fields(beverage = %self.beverage))]
    pub async fn run(self) -> OrderOutcome {
        if let Some(ingredient) = self.missing_ingredient() {
            warn!(ingredient, "Ingredient not available");
            return OrderOutcome::Unavailable {
                beverage: self.beverage.clone(),
                ingredient: ingredient.to_string(),
            };
        }

        let reservation = match self.reserve().await {
            Ok(reservation) => reservation,
            Err(outcome) => return outcome,
        };

        let low_stock = &self.low_stock;
        reservation.commit(|ingredient, remaining| {
            debug!(ingredient, remaining, "Consumed");
            if remaining == 0 {
                low_stock.record(ingredient, 0);
            }
        });

        info!("Prepared");
        OrderOutcome::Prepared {
            beverage: self.beverage.clone(),
        }
    }

    /// First ingredient, in recipe order, that the store does not stock.
    fn missing_ingredient(&self) -> Option<&str> {
        self.recipe
            .keys()
            .map(String::as_str)
            .find(|ingredient| !self.store.contains(ingredient))
    }

    /// Requirements sorted by ingredient name.
    ///
    /// Every worker locks in this one global order, so two orders sharing
    /// ingredients can never wait on each other in a cycle.
    fn acquisition_order(&self) -> Vec<(&str, Quantity)> {
        let mut order: Vec<(&str, Quantity)> = self
            .recipe
            .iter()
            .map(|(ingredient, required)| (ingredient.as_str(), *required))
            .collect();
        order.sort_unstable_by(|a, b| a.0.cmp(b.0));
        order
    }

    async fn reserve(&self) -> Result<Reservation, OrderOutcome> {
        let mut reservation = Reservation::new();

        for (ingredient, required) in self.acquisition_order() {
            let lock = match self.store.acquire(ingredient).await {
                Ok(lock) => lock,
                Err(e) => {
                    // Existence was checked up front; the store's ingredient set is fixed.
                    warn!(error = %e, "Acquire failed");
                    reservation.release();
                    return Err(OrderOutcome::Unavailable {
                        beverage: self.beverage.clone(),
                        ingredient: ingredient.to_string(),
                    });
                }
            };

            if let Err(short) = reservation.claim(lock, required) {
                let available = short.peek();
                self.low_stock.record(ingredient, available);
                short.release();
                let released = reservation.release() + 1;
                warn!(ingredient, required, available, released, "Ingredient not sufficient");
                return Err(OrderOutcome::Insufficient {
                    beverage: self.beverage.clone(),
                    ingredient: ingredient.to_string(),
                    available,
                });
            }
        }

        debug!(locks = reservation.len(), "Reserved");
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn recipe(items: &[(&str, Quantity)]) -> Recipe {
        items
            .iter()
            .map(|(ingredient, quantity)| (ingredient.to_string(), *quantity))
            .collect()
    }

    fn shop(stock: &[(&str, Quantity)]) -> (Arc<InventoryStore>, LowStockTracker) {
        let store = InventoryStore::new(stock.iter().map(|(name, qty)| (name.to_string(), *qty)));
        (Arc::new(store), LowStockTracker::new())
    }

    fn hot_tea() -> Recipe {
        recipe(&[
            ("water", 200),
            ("milk", 100),
            ("ginger", 10),
            ("sugar", 10),
            ("tea", 30),
        ])
    }

    #[tokio::test]
    async fn test_prepares_and_records_exhausted() {
        let (store, low_stock) = shop(&[
            ("water", 500),
            ("milk", 100),
            ("ginger", 30),
            ("sugar", 50),
            ("tea", 30),
        ]);

        let worker = OrderWorker::new("hot_tea", hot_tea(), Arc::clone(&store), low_stock.clone());
        assert_eq!(worker.beverage(), "hot_tea");
        let outcome = worker.run().await;

        assert_eq!(outcome, OrderOutcome::Prepared { beverage: "hot_tea".into() });
        let inventory = store.snapshot().await;
        assert_eq!(inventory["water"], 300);
        assert_eq!(inventory["milk"], 0);
        assert_eq!(inventory["ginger"], 20);
        assert_eq!(inventory["sugar"], 40);
        assert_eq!(inventory["tea"], 0);

        let low = low_stock.snapshot();
        assert_eq!(low.len(), 2);
        assert_eq!(low["milk"], 0);
        assert_eq!(low["tea"], 0);
    }

    #[tokio::test]
    async fn test_missing_ingredient_takes_no_locks() {
        let (store, low_stock) = shop(&[("water", 500), ("sugar", 50)]);

        // Hold a lock the worker would need; existence fails before any acquire.
        let held = store.acquire("water").await.unwrap();
        let worker = OrderWorker::new(
            "green_tea",
            recipe(&[("water", 100), ("green_mixture", 30), ("sugar", 50)]),
            Arc::clone(&store),
            low_stock.clone(),
        );
        let outcome = timeout(Duration::from_secs(1), worker.run())
            .await
            .expect("existence check must not wait on locks");
        drop(held);

        assert_eq!(
            outcome,
            OrderOutcome::Unavailable {
                beverage: "green_tea".into(),
                ingredient: "green_mixture".into(),
            }
        );
        assert_eq!(store.quantity("water").await, Some(500));
        assert!(low_stock.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_releases_every_lock() {
        // Sorted order is ginger, milk, sugar, tea, water; sugar is short.
        let (store, low_stock) = shop(&[
            ("water", 500),
            ("milk", 100),
            ("ginger", 30),
            ("sugar", 5),
            ("tea", 30),
        ]);

        let outcome = OrderWorker::new("hot_tea", hot_tea(), Arc::clone(&store), low_stock.clone())
            .run()
            .await;

        assert_eq!(
            outcome,
            OrderOutcome::Insufficient {
                beverage: "hot_tea".into(),
                ingredient: "sugar".into(),
                available: 5,
            }
        );
        assert_eq!(low_stock.get("sugar"), Some(5));

        for ingredient in ["water", "milk", "ginger", "sugar", "tea"] {
            let lock = timeout(Duration::from_millis(200), store.acquire(ingredient))
                .await
                .unwrap_or_else(|_| panic!("{ingredient} is still locked"))
                .unwrap();
            drop(lock);
        }
        assert_eq!(store.quantity("milk").await, Some(100));
        assert_eq!(store.quantity("ginger").await, Some(30));
    }

    #[tokio::test]
    async fn test_reports_first_short_ingredient_in_sorted_order() {
        let (store, low_stock) = shop(&[("water", 0), ("milk", 0), ("ginger", 0), ("sugar", 0), ("tea", 0)]);

        let outcome = OrderWorker::new("hot_tea", hot_tea(), store, low_stock.clone())
            .run()
            .await;

        assert_eq!(
            outcome,
            OrderOutcome::Insufficient {
                beverage: "hot_tea".into(),
                ingredient: "ginger".into(),
                available: 0,
            }
        );
        assert_eq!(low_stock.snapshot().into_iter().collect::<Vec<_>>(), [("ginger".to_string(), 0)]);
    }
}
