//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! Every worker runs inside an `order` span carrying the beverage name, and the
//! whole run sits inside a `dispatch` span.
//!
//! ## Configuration
//!
//! Log levels come from the `RUST_LOG` environment variable. The output uses a
//! compact format without module paths (`with_target(false)`).
//!
//! ```bash
//! # Outcomes and run summary
//! RUST_LOG=info cargo run
//!
//! # Reservations, consumption and low-stock records
//! RUST_LOG=debug cargo run
//!
//! # Every lock acquire, commit and release
//! RUST_LOG=trace cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Run lifecycle**: worker start, completion and summary counts
//! - **Outcomes**: `Prepared` at info, `Unavailable`/`Insufficient` at warn
//! - **Bookkeeping**: consumed amounts and low-stock records at debug
//! - **Locks**: acquire, commit and release at trace
//!
//! With `RUST_LOG=info` a run over the bundled sample data looks like:
//!
//! ```text
//! INFO dispatch: Starting workers ingredients=5 limit=Some(3) beverages=4
//! WARN dispatch:order: Ingredient not available ingredient="green_mixture" beverage=green_tea
//! INFO dispatch:order: Prepared beverage=hot_tea
//! INFO dispatch:order: Prepared beverage=hot_coffee
//! WARN dispatch:order: Ingredient not sufficient ingredient="hot_water" required=300 available=200 released=2 beverage=black_tea
//! INFO dispatch: Run complete prepared=2 orders=4 beverages=4
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
