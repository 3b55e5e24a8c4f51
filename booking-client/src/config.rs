//! Client configuration

/// Configuration for connecting to the reservation store and its relay
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store base URL (e.g. "http://localhost:3000/api")
    pub base_url: String,

    /// Relay TCP address (e.g. "127.0.0.1:8081")
    pub relay_addr: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a new configuration with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            relay_addr: None,
            timeout_secs: 30,
        }
    }

    /// Set the relay TCP address
    pub fn with_relay_addr(mut self, addr: impl Into<String>) -> Self {
        self.relay_addr = Some(addr.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
