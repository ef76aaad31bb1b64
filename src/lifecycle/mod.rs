//! Run orchestration and lifecycle management.
//!
//! This module contains the infrastructure around a single order-processing run:
//!
//! - **Dispatch**: Validating input, spawning workers, and joining them
//! - **Configuration**: Outcome buffering and worker concurrency limits
//! - **Observability setup**: Initializing tracing and logging
//!
//! # Main Components
//!
//! - [`Dispatcher`] - Runs every order in the input concurrently and reports the result
//! - [`DispatcherConfig`] - Tuning, loadable from the environment
//! - [`DispatchError`] - Errors that abort a whole run
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod tracing;

pub use config::*;
pub use dispatcher::*;
pub use error::*;
pub use self::tracing::setup_tracing;
