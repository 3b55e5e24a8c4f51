use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Handshake ====================

/// Handshake payload (client -> relay)
///
/// Carries the client's protocol version for server-side validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// Protocol version
    pub version: u16,
    /// Client name/identifier
    pub client_name: Option<String>,
    /// Client version
    pub client_version: Option<String>,
}

// ==================== Notification ====================

/// Generic operator notification (relay -> console)
///
/// Shown to the operator as-is; never interpreted by the lifecycle core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub id: i64,
    /// Store-defined notification type code
    #[serde(rename = "type")]
    pub kind: i32,
    pub title: String,
    pub message: String,
    /// Opaque extra data attached by the store
    #[serde(default)]
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==================== Reservation events ====================

/// Payload shared by `ReservationCreated` and `AssignTableForReservation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEventPayload {
    /// Reservation id
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub number_of_people: u32,
}
