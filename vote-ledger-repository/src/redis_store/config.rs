//! Redis connection configuration.

use std::time::Duration;

/// Configuration for the Redis store.
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379`.
    pub url: String,
    /// Timeout for each connection attempt.
    pub connection_timeout: Duration,
    /// Timeout for each command round trip.
    pub response_timeout: Duration,
    /// Reconnect attempts made by the connection manager before giving up.
    pub number_of_retries: usize,
}

impl RedisStoreConfig {
    /// Create a configuration with default timeouts (1s) and a single reconnect attempt.
    ///
    /// # Arguments
    ///
    /// * `url` - The Redis connection URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection_timeout: Duration::from_millis(1000),
            response_timeout: Duration::from_millis(1000),
            number_of_retries: 1,
        }
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_number_of_retries(mut self, retries: usize) -> Self {
        self.number_of_retries = retries;
        self
    }
}
