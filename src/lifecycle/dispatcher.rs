use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, instrument, warn};

use super::{DispatchError, DispatcherConfig};
use crate::inventory::{InventoryStore, LowStockTracker};
use crate::model::{OrderData, Outlets, Recipe, RunReport};
use crate::worker::OrderWorker;

/// The orchestrator for one order-processing run.
///
/// `Dispatcher` is responsible for:
/// - **Validation**: Rejecting blank or malformed order data before anything starts
/// - **Setup**: Building the shared [`InventoryStore`] and [`LowStockTracker`]
/// - **Fan-out**: Spawning one [`OrderWorker`] per beverage in its own Tokio task
/// - **Join**: Collecting every outcome and waiting for every worker
///
/// # Example
///
/// ```ignore
/// let dispatcher = Dispatcher::default();
/// let report = dispatcher.process(Some(&order_data)).await?;
///
/// for outcome in &report.outcomes {
///     println!("{outcome}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Creates a dispatcher with the given configuration.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidConfig`] if the configuration does not validate.
    pub fn new(config: DispatcherConfig) -> Result<Self, DispatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Decodes the order data and runs every order in it.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidInput`] for absent or empty data (no workers start)
    /// - [`DispatchError::MalformedInput`] for data of the wrong shape
    /// - [`DispatchError::WorkerFailed`] if a worker task panicked
    pub async fn process(&self, order_data: Option<&Value>) -> Result<RunReport, DispatchError> {
        let data = OrderData::from_value(order_data)?;
        self.run(data).await
    }

    /// Runs every order in already-decoded order data.
    ///
    /// Returns once all workers have finished. Outcomes are listed in the
    /// order workers emitted them, which depends on scheduling.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::MalformedInput`] if the data fails validation
    /// - [`DispatchError::WorkerFailed`] if a worker task panicked
    #[instrument(name = "dispatch", skip_all, fields(beverages = data.beverages.len()))]
    pub async fn run(&self, data: OrderData) -> Result<RunReport, DispatchError> {
        data.validate()?;

        let OrderData {
            total_items_quantity,
            beverages,
            outlets,
        } = data;

        let store = Arc::new(InventoryStore::new(total_items_quantity));
        self.dispatch(store, LowStockTracker::new(), beverages, outlets)
            .await
    }

    /// Runs one worker per beverage against an existing store and tracker.
    ///
    /// The report's inventory and low-stock snapshot are taken from `store`
    /// and `low_stock` once every worker has finished.
    ///
    /// # Errors
    ///
    /// [`DispatchError::WorkerFailed`] if a worker task panicked.
    pub async fn dispatch(
        &self,
        store: Arc<InventoryStore>,
        low_stock: LowStockTracker,
        beverages: IndexMap<String, Recipe>,
        outlets: Option<Outlets>,
    ) -> Result<RunReport, DispatchError> {
        // =====================================================================
        // 1. Size the outlet limit
        // =====================================================================

        // Configuration wins over the outlet count in the data. More permits
        // than workers never changes anything, so the limit is capped there.
        let limit = self
            .config
            .max_concurrent_workers
            .or(outlets.map(|outlets| outlets.count_n))
            .map(|limit| limit.min(beverages.len()).max(1));
        let permits = limit.map(|limit| Arc::new(Semaphore::new(limit)));

        info!(ingredients = store.len(), ?limit, "Starting workers");

        // =====================================================================
        // 2. Spawn one worker per beverage
        // =====================================================================

        let (sender, mut receiver) = mpsc::channel(self.config.outcome_buffer);
        let mut handles = Vec::with_capacity(beverages.len());

        for (beverage, recipe) in beverages {
            let worker = OrderWorker::new(beverage, recipe, Arc::clone(&store), low_stock.clone());
            let sender = sender.clone();
            let permits = permits.clone();

            handles.push(tokio::spawn(async move {
                // Held until the worker is done.
                let _permit = match permits {
                    Some(permits) => match permits.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            // Only reachable if the semaphore is closed, which nothing does.
                            error!(beverage = worker.beverage(), error = %e, "Outlet limit unavailable");
                            None
                        }
                    },
                    None => None,
                };
                let outcome = worker.run().await;
                if sender.send(outcome).await.is_err() {
                    warn!("Outcome receiver dropped");
                }
            }));
        }

        // Only the workers hold senders now, so the channel closes when the last one finishes.
        drop(sender);

        // =====================================================================
        // 3. Collect outcomes, then join
        // =====================================================================

        let mut outcomes = Vec::with_capacity(handles.len());
        while let Some(outcome) = receiver.recv().await {
            debug!(%outcome, "Outcome received");
            outcomes.push(outcome);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Worker task failed: {:?}", e);
                return Err(e.into());
            }
        }

        let report = RunReport {
            outcomes,
            inventory: store.snapshot().await,
            low_stock: low_stock.snapshot(),
        };

        info!(
            prepared = report.prepared().len(),
            orders = report.outcomes.len(),
            "Run complete"
        );
        Ok(report)
    }
}
