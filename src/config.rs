//! Configuration for LedgerKV
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{LedgerError, Result};

/// Main configuration for a LedgerKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Width (P) of the key prefix stored in each index entry.
    /// Must match the value the index producer used.
    pub prefix_len: usize,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Max decoded indices, and separately max decoded batches, kept in memory.
    /// 0 disables caching.
    pub cache_capacity: usize,

    // -------------------------------------------------------------------------
    // Fetch Configuration
    // -------------------------------------------------------------------------
    /// Max concurrent batch fetches per query
    pub fetch_workers: usize,

    /// Deadline for all batch fetches of one query (milliseconds, 0 = none)
    pub fetch_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix_len: 32,
            cache_capacity: 1024,
            fetch_workers: 8,
            fetch_timeout_ms: 30_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Fetch deadline as a Duration, `None` when disabled
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.prefix_len == 0 {
            return Err(LedgerError::Config("prefix_len must be at least 1".to_string()));
        }
        if self.fetch_workers == 0 {
            return Err(LedgerError::Config("fetch_workers must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the index key prefix width
    pub fn prefix_len(mut self, len: usize) -> Self {
        self.config.prefix_len = len;
        self
    }

    /// Set the cache capacity (entries per cache)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set the number of parallel fetch workers
    pub fn fetch_workers(mut self, workers: usize) -> Self {
        self.config.fetch_workers = workers;
        self
    }

    /// Set the fetch deadline (in milliseconds)
    pub fn fetch_timeout_ms(mut self, ms: u64) -> Self {
        self.config.fetch_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
