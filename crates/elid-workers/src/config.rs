use elid_core::constants::{DEFAULT_MAX_INTERVAL_MS, DEFAULT_MIN_INTERVAL_MS, DEFAULT_STOP_TIMEOUT_MS};
use std::time::Duration;
use thiserror::Error;

/// Worker configuration is unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid worker configuration: {0}")]
pub struct ConfigError(pub String);

/// Timing of device workers.
///
/// Between two events a worker sleeps for a duration drawn uniformly from
/// `[min_interval, max_interval]`. `stop_timeout` bounds how long a stop
/// request waits for a worker to finish an in-flight emission before the
/// task is aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub stop_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            max_interval: Duration::from_millis(DEFAULT_MAX_INTERVAL_MS),
            stop_timeout: Duration::from_millis(DEFAULT_STOP_TIMEOUT_MS),
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both interval bounds
    pub fn interval(mut self, min: Duration, max: Duration) -> Self {
        self.min_interval = min;
        self.max_interval = max;
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Check that the bounds describe a usable interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the minimum interval is zero, exceeds the
    /// maximum, or the stop timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval.is_zero() {
            return Err(ConfigError("min_interval must be greater than zero".into()));
        }
        if self.min_interval > self.max_interval {
            return Err(ConfigError(format!(
                "min_interval ({:?}) exceeds max_interval ({:?})",
                self.min_interval, self.max_interval
            )));
        }
        if self.stop_timeout.is_zero() {
            return Err(ConfigError("stop_timeout must be greater than zero".into()));
        }
        Ok(())
    }
}
