use std::sync::Arc;
use tokio::sync::broadcast;

use crate::relay::RelayError;
use crate::relay::transport::{MemoryRelayTransport, RelayTransport, TcpRelayTransport};
use shared::relay::{HandshakePayload, PROTOCOL_VERSION, RelayMessage};

/// Relay client
///
/// Owns the transport and fans inbound messages out to subscribers through a
/// broadcast channel. A background task drains the transport for the
/// lifetime of the connection; when the read loop ends the channel closes
/// and subscribers observe the disconnect.
#[derive(Debug, Clone)]
pub struct RelayClient {
    transport: Arc<dyn RelayTransport>,
    event_tx: broadcast::Sender<RelayMessage>,
}

impl RelayClient {
    fn new(transport: Arc<dyn RelayTransport>) -> Self {
        let (event_tx, _) = broadcast::channel(1024);

        let client = Self {
            transport: transport.clone(),
            event_tx: event_tx.clone(),
        };

        // Background task: forward every inbound message to subscribers
        tokio::spawn(async move {
            loop {
                match transport.read_message().await {
                    Ok(msg) => {
                        if let Err(e) = event_tx.send(msg) {
                            tracing::debug!("No subscribers for relay event: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Relay transport read error: {}", e);
                        break;
                    }
                }
            }
        });

        client
    }

    /// Connect via TCP and perform the handshake
    pub async fn connect(addr: &str, client_name: &str) -> Result<Self, RelayError> {
        let transport = TcpRelayTransport::connect(addr).await?;

        let payload = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some(client_name.to_string()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        };
        transport
            .write_message(&RelayMessage::handshake(&payload))
            .await?;

        Ok(Self::new(Arc::new(transport)))
    }

    /// Create an in-memory client (tests and the interactive demo)
    pub fn memory(
        relay_broadcast_tx: &broadcast::Sender<RelayMessage>,
        client_to_relay_tx: &broadcast::Sender<RelayMessage>,
    ) -> Self {
        let transport = MemoryRelayTransport::new(relay_broadcast_tx, client_to_relay_tx);
        Self::new(Arc::new(transport))
    }

    /// Subscribe to inbound relay events
    ///
    /// Each subscriber gets every message from its subscription onward.
    pub fn subscribe(&self) -> broadcast::Receiver<RelayMessage> {
        self.event_tx.subscribe()
    }

    /// Send a message (fire and forget)
    pub async fn send(&self, msg: &RelayMessage) -> Result<(), RelayError> {
        self.transport.write_message(msg).await
    }

    /// Close the connection
    pub async fn close(&self) -> Result<(), RelayError> {
        self.transport.close().await
    }
}
