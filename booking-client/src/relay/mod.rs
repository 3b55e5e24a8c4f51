//! Live event relay client
//!
//! The relay is the push channel delivering advisory events (new
//! reservation, table-assignment suggestion, operator notifications). It is
//! at-most-informational: nothing received here mutates reservation state;
//! the console re-fetches through the booking client when the operator acts.

mod client;
mod connection;
mod transport;

pub use client::RelayClient;
pub use connection::{ConnectionState, RelayConnection};
pub use transport::{MemoryRelayTransport, RelayTransport, TcpRelayTransport};

use thiserror::Error;

/// Relay error type
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO failure on the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection-level failure (dial, channel, handshake)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Frame did not parse
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
