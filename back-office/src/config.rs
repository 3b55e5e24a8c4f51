//! Console configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | STORE_URL | http://localhost:3000/api | Reservation store base URL |
//! | RELAY_ADDR | 127.0.0.1:8081 | Relay TCP address |
//! | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout (ms) |
//! | LOG_LEVEL | info | Log level |
//! | LOG_DIR | (none) | Daily-rolling log file directory |

use std::time::Duration;

use booking_client::ClientConfig;

/// Console configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Reservation store base URL
    pub store_url: String,
    /// Relay TCP address
    pub relay_addr: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            store_url: std::env::var("STORE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".into()),
            relay_addr: std::env::var("RELAY_ADDR").unwrap_or_else(|_| "127.0.0.1:8081".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override the endpoints, keeping everything else from the environment
    ///
    /// Used by tests
    pub fn with_overrides(store_url: impl Into<String>, relay_addr: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.store_url = store_url.into();
        config.relay_addr = relay_addr.into();
        config
    }

    /// The per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Client configuration derived from this console configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.store_url.clone())
            .with_relay_addr(self.relay_addr.clone())
            .with_timeout_secs(self.request_timeout_ms.div_ceil(1000).max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
