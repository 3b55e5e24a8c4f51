//! Live event relay message types
//!
//! These types are shared between the relay client and whatever pushes the
//! events. The relay is advisory only: it carries no delivery-order or
//! exactly-once guarantee, so consumers treat every message as a hint to
//! alert the operator, never as a state mutation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// Relay protocol version
pub const PROTOCOL_VERSION: u16 = 1;

/// Relay event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Handshake message
    Handshake = 0,
    /// Generic operator notification
    Notification = 1,
    /// A guest created a new reservation
    ReservationCreated = 2,
    /// A confirmed reservation needs a table picked soon
    AssignTableForReservation = 3,
    /// Order item status change (no-op hook for this console)
    OrderItemUpdatedStatus = 4,
}

impl TryFrom<u8> for EventKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::Handshake),
            1 => Ok(EventKind::Notification),
            2 => Ok(EventKind::ReservationCreated),
            3 => Ok(EventKind::AssignTableForReservation),
            4 => Ok(EventKind::OrderItemUpdatedStatus),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Handshake => write!(f, "handshake"),
            EventKind::Notification => write!(f, "notification"),
            EventKind::ReservationCreated => write!(f, "reservation_created"),
            EventKind::AssignTableForReservation => write!(f, "assign_table_for_reservation"),
            EventKind::OrderItemUpdatedStatus => write!(f, "order_item_updated_status"),
        }
    }
}

/// Relay wire message
///
/// Framed on the wire as `[kind: u8][request_id: 16 bytes][len: u32 LE][payload]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub request_id: Uuid,
    pub kind: EventKind,
    pub payload: Vec<u8>,
}

impl RelayMessage {
    pub fn new(kind: EventKind, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            kind,
            payload,
        }
    }

    /// Create a handshake message
    pub fn handshake(payload: &HandshakePayload) -> Self {
        Self::new(
            EventKind::Handshake,
            serde_json::to_vec(payload).expect("Failed to serialize handshake payload"),
        )
    }

    /// Create an operator notification
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventKind::Notification,
            serde_json::to_vec(payload).expect("Failed to serialize notification"),
        )
    }

    /// Create a reservation-created event
    pub fn reservation_created(payload: &ReservationEventPayload) -> Self {
        Self::new(
            EventKind::ReservationCreated,
            serde_json::to_vec(payload).expect("Failed to serialize reservation event"),
        )
    }

    /// Create an assign-table suggestion event
    pub fn assign_table(payload: &ReservationEventPayload) -> Self {
        Self::new(
            EventKind::AssignTableForReservation,
            serde_json::to_vec(payload).expect("Failed to serialize reservation event"),
        )
    }

    /// Parse the payload into a concrete type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
