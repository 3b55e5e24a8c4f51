use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::relay::RelayError;
use shared::relay::{EventKind, RelayMessage};

/// Transport abstraction for relay communication
#[async_trait]
pub trait RelayTransport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<RelayMessage, RelayError>;
    async fn write_message(&self, msg: &RelayMessage) -> Result<(), RelayError>;
    async fn close(&self) -> Result<(), RelayError>;
}

/// TCP transport
///
/// Frame layout: `[kind: u8][request_id: 16 bytes][len: u32 LE][payload]`.
#[derive(Debug, Clone)]
pub struct TcpRelayTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpRelayTransport {
    pub async fn connect(addr: &str) -> Result<Self, RelayError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| RelayError::Connection(e.to_string()))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl RelayTransport for TcpRelayTransport {
    async fn read_message(&self) -> Result<RelayMessage, RelayError> {
        let mut reader = self.reader.lock().await;

        // Event kind (1 byte)
        let mut kind_buf = [0u8; 1];
        reader.read_exact(&mut kind_buf).await.map_err(RelayError::Io)?;

        let kind = EventKind::try_from(kind_buf[0])
            .map_err(|_| RelayError::InvalidMessage("Invalid event kind".into()))?;

        // Request ID (16 bytes)
        let mut uuid_buf = [0u8; 16];
        reader.read_exact(&mut uuid_buf).await.map_err(RelayError::Io)?;
        let request_id = Uuid::from_bytes(uuid_buf);

        // Payload length (4 bytes)
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf).await.map_err(RelayError::Io)?;
        let len = u32::from_le_bytes(len_buf) as usize;

        // Payload
        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await.map_err(RelayError::Io)?;

        Ok(RelayMessage {
            request_id,
            kind,
            payload,
        })
    }

    async fn write_message(&self, msg: &RelayMessage) -> Result<(), RelayError> {
        let mut writer = self.writer.lock().await;
        let mut data = Vec::with_capacity(21 + msg.payload.len());
        data.push(msg.kind as u8);
        data.extend_from_slice(msg.request_id.as_bytes());
        data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&msg.payload);

        writer.write_all(&data).await.map_err(RelayError::Io)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), RelayError> {
        // Dropping the halves closes the stream
        Ok(())
    }
}

/// Memory transport (for in-process tests)
#[derive(Debug, Clone)]
pub struct MemoryRelayTransport {
    /// Receiver for messages FROM the relay (broadcasts)
    rx: Arc<Mutex<broadcast::Receiver<RelayMessage>>>,
    /// Sender for messages TO the relay
    tx: broadcast::Sender<RelayMessage>,
}

impl MemoryRelayTransport {
    /// Create a new memory transport
    ///
    /// # Arguments
    /// * `relay_broadcast_tx` - the relay's broadcast sender (subscribed for pushes)
    /// * `client_to_relay_tx` - the channel carrying messages to the relay
    pub fn new(
        relay_broadcast_tx: &broadcast::Sender<RelayMessage>,
        client_to_relay_tx: &broadcast::Sender<RelayMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(relay_broadcast_tx.subscribe())),
            tx: client_to_relay_tx.clone(),
        }
    }
}

#[async_trait]
impl RelayTransport for MemoryRelayTransport {
    async fn read_message(&self) -> Result<RelayMessage, RelayError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| RelayError::Connection(format!("Memory channel error: {}", e)))
    }

    async fn write_message(&self, msg: &RelayMessage) -> Result<(), RelayError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| RelayError::Connection(format!("Failed to send to relay: {}", e)))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
