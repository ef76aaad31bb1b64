use brew_reservation::lifecycle::{setup_tracing, DispatchError, Dispatcher, DispatcherConfig};
use brew_reservation::model::OrderData;
use tracing::{error, info, warn, Instrument};

const SAMPLE_ORDER_DATA: &str = include_str!("../data/order_data.json");

#[tokio::main]
async fn main() -> Result<(), DispatchError> {
    setup_tracing();

    info!("Starting coffee machine with sample order data");

    let dispatcher = Dispatcher::new(DispatcherConfig::from_env()?)?;
    let data = OrderData::from_json(SAMPLE_ORDER_DATA)?;

    let span = tracing::info_span!("coffee_machine");
    let report = match dispatcher.run(data).instrument(span).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Order processing failed");
            return Err(e);
        }
    };

    for outcome in &report.outcomes {
        if outcome.is_prepared() {
            info!("{outcome}");
        } else {
            warn!("{outcome}");
        }
    }

    for (ingredient, quantity) in &report.inventory {
        info!(ingredient = %ingredient, quantity, "Remaining");
    }
    for (ingredient, quantity) in &report.low_stock {
        warn!(ingredient = %ingredient, quantity, "Running low");
    }

    info!("Coffee machine finished");
    Ok(())
}
