//! Dispatcher configuration.

use tokio::sync::Semaphore;

use super::DispatchError;

/// Default capacity of the outcome channel between workers and the dispatcher.
pub const DEFAULT_OUTCOME_BUFFER: usize = 32;

/// Environment variable overriding [`DispatcherConfig::outcome_buffer`].
pub const OUTCOME_BUFFER_ENV: &str = "BREW_OUTCOME_BUFFER";

/// Environment variable overriding [`DispatcherConfig::max_concurrent_workers`].
pub const MAX_WORKERS_ENV: &str = "BREW_MAX_WORKERS";

/// Tuning for a [`Dispatcher`](super::Dispatcher).
///
/// Reads from environment variables via [`DispatcherConfig::from_env`]:
/// - `BREW_OUTCOME_BUFFER` - outcome channel capacity (default: `32`)
/// - `BREW_MAX_WORKERS` - cap on workers preparing at once (default: the
///   order data's outlet count, or unbounded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub outcome_buffer: usize,

    /// Takes precedence over the outlet count carried by the order data.
    pub max_concurrent_workers: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            outcome_buffer: DEFAULT_OUTCOME_BUFFER,
            max_concurrent_workers: None,
        }
    }
}

impl DispatcherConfig {
    pub fn with_outcome_buffer(mut self, outcome_buffer: usize) -> Self {
        self.outcome_buffer = outcome_buffer;
        self
    }

    pub fn with_max_concurrent_workers(mut self, max: usize) -> Self {
        self.max_concurrent_workers = Some(max);
        self
    }

    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidConfig`] if a variable is set but not a positive integer.
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DispatchError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(OUTCOME_BUFFER_ENV) {
            config.outcome_buffer = parse_count(OUTCOME_BUFFER_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MAX_WORKERS_ENV) {
            config.max_concurrent_workers = Some(parse_count(MAX_WORKERS_ENV, &raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`DispatchError::InvalidConfig`] for a zero or oversized buffer, or a
    /// zero or oversized worker cap. Both sizes are bounded by
    /// [`Semaphore::MAX_PERMITS`].
    pub fn validate(&self) -> Result<(), DispatchError> {
        check_count("outcome buffer", self.outcome_buffer)?;
        if let Some(max) = self.max_concurrent_workers {
            check_count("max concurrent workers", max)?;
        }
        Ok(())
    }
}

fn check_count(name: &str, count: usize) -> Result<(), DispatchError> {
    if count == 0 {
        return Err(DispatchError::InvalidConfig(format!("{name} must be positive")));
    }
    if count > Semaphore::MAX_PERMITS {
        return Err(DispatchError::InvalidConfig(format!(
            "{name} must be at most {}",
            Semaphore::MAX_PERMITS
        )));
    }
    Ok(())
}

fn parse_count(key: &str, raw: &str) -> Result<usize, DispatchError> {
    raw.trim()
        .parse()
        .map_err(|e| DispatchError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
