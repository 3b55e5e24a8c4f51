//! Shared types for the reservation back-office
//!
//! Common types used across the client and console crates: domain models,
//! the store response envelope, and relay message types.

pub mod models;
pub mod relay;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Relay re-exports (for convenient access)
pub use relay::{EventKind, RelayMessage};

// Envelope re-export
pub use response::ApiResponse;
