//! Typed client for the reservation store and its live event relay
//!
//! Two halves, mirroring the two channels the back office talks over:
//! - [`BookingApi`] / [`HttpBookingClient`]: request/response operations
//!   against the reservation store (confirm, cancel, assign, ...).
//! - [`relay`]: the push channel delivering advisory events (new
//!   reservation, table-assignment suggestion, generic notifications).
//!
//! The client layer owns no state and performs no retries; every failure is
//! surfaced to the caller, which decides what the operator sees.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod relay;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{BookingApi, HttpBookingClient};
pub use memory::{CallRecord, MemoryBookingStore, StoreOp};
pub use relay::{ConnectionState, RelayClient, RelayConnection, RelayError};
