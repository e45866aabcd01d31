//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{parse_size, ByteSize};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Memory budget for the cache
    pub max_memory: ByteSize,
    /// Interval between TTL reaper sweeps in milliseconds
    pub reap_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_MEMORY` - Memory budget such as `512MB` (default: 100MB)
    /// - `REAP_INTERVAL_MS` - Reaper frequency in milliseconds (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_memory: env::var("MAX_MEMORY")
                .ok()
                .map(|v| parse_size(&v))
                .unwrap_or_default(),
            reap_interval_ms: env::var("REAP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Reaper interval as a Duration.
    pub fn reap_interval(&self) -> Duration {
        Duration::from_millis(self.reap_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_memory: ByteSize::default(),
            reap_interval_ms: 1000,
            server_port: 3000,
        }
    }
}
