use tokio::sync::Mutex;

use crate::relay::RelayError;
use crate::relay::client::RelayClient;

/// Relay connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

struct Inner {
    state: ConnectionState,
    client: Option<RelayClient>,
}

/// Connection manager owning the relay connection state
///
/// `ensure_connected` is idempotent: while a dial is in progress every other
/// caller waits on the same attempt, and an established connection is reused
/// until `disconnect`. At most one relay connection exists per manager.
pub struct RelayConnection {
    addr: String,
    client_name: String,
    inner: Mutex<Inner>,
}

impl RelayConnection {
    pub fn new(addr: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            client_name: client_name.into(),
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                client: None,
            }),
        }
    }

    /// Current connection state
    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    /// Return the live client, dialing first if necessary
    ///
    /// The lock is held across the dial, so a concurrent caller blocks until
    /// the in-flight attempt resolves and then reuses its outcome instead of
    /// opening a second connection.
    pub async fn ensure_connected(&self) -> Result<RelayClient, RelayError> {
        let mut inner = self.inner.lock().await;

        if inner.state == ConnectionState::Connected
            && let Some(client) = &inner.client
        {
            return Ok(client.clone());
        }

        inner.state = ConnectionState::Connecting;
        tracing::info!(addr = %self.addr, "Connecting to relay");

        match RelayClient::connect(&self.addr, &self.client_name).await {
            Ok(client) => {
                inner.state = ConnectionState::Connected;
                inner.client = Some(client.clone());
                tracing::info!(addr = %self.addr, "Relay connected");
                Ok(client)
            }
            Err(e) => {
                inner.state = ConnectionState::Disconnected;
                inner.client = None;
                tracing::warn!(addr = %self.addr, error = %e, "Relay connection failed");
                Err(e)
            }
        }
    }

    /// Drop the connection, if any
    pub async fn disconnect(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(client) = inner.client.take()
            && let Err(e) = client.close().await
        {
            tracing::warn!(error = %e, "Relay close failed");
        }
        inner.state = ConnectionState::Disconnected;
    }
}
