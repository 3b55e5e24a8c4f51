//! Reservation model and lifecycle status
//!
//! A reservation is a booking request for a party. It carries a status that
//! moves along a fixed lifecycle and zero or more table assignments. The
//! store owns the persisted state; these types are the wire projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Status ====================

/// Reservation lifecycle status
///
/// Transitions are monotonic:
/// `Created` → `Confirmed` → `Checkedin`, with `Cancelled` reachable from
/// `Created` and `Confirmed`. `Checkedin` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Created,
    Confirmed,
    Checkedin,
    Cancelled,
}

impl ReservationStatus {
    /// Confirm is only offered on a fresh reservation
    pub fn can_confirm(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Cancel is allowed until the guest has arrived
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Created | Self::Confirmed)
    }

    /// Check-in requires confirmation first; the console additionally
    /// requires at least one assigned table
    pub fn can_check_in(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Terminal states accept no further lifecycle operations
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Checkedin | Self::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Checkedin => write!(f, "Checkedin"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Priority tier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityTier {
    #[default]
    Standard,
    Priority,
    Vip,
}

// ==================== Reservation ====================

/// A binding of one physical table to one reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAssignment {
    pub table_id: String,
    pub reservation_id: String,
}

/// Reservation entity as returned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub guest_count: u32,
    pub booking_date: DateTime<Utc>,
    #[serde(rename = "reservationPriorityStatus", default)]
    pub priority: PriorityTier,
    pub status: ReservationStatus,
    #[serde(rename = "tableAssignReservations", default)]
    pub table_assignments: Vec<TableAssignment>,
}

impl Reservation {
    /// Whether any table is currently bound to this reservation
    pub fn has_tables_assigned(&self) -> bool {
        !self.table_assignments.is_empty()
    }

    /// The ids of all currently assigned tables, in store order
    pub fn table_ids(&self) -> Vec<String> {
        self.table_assignments
            .iter()
            .map(|ta| ta.table_id.clone())
            .collect()
    }
}

/// List result for the reservations query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResult {
    pub items: Vec<Reservation>,
    #[serde(default)]
    pub total_count: u64,
}

// ==================== Request payloads ====================

/// Staff-initiated booking creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingData {
    pub customer_name: String,
    pub phone_number: String,
    pub number_of_people: u32,
    pub booking_date: DateTime<Utc>,
    /// True when a staff member books on behalf of a walk-in caller
    pub is_created_by_manager: bool,
}

/// Update payload for an existing reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationData {
    pub id: String,
    pub booking_date: DateTime<Utc>,
    pub guest_count: u32,
}

/// Assign/unassign request body: `{reservationId, tableId: [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAssignmentRequest {
    pub reservation_id: String,
    /// One or more table ids; the wire field keeps the original singular name
    #[serde(rename = "tableId")]
    pub table_ids: Vec<String>,
}

impl TableAssignmentRequest {
    pub fn new(reservation_id: impl Into<String>, table_ids: Vec<String>) -> Self {
        Self {
            reservation_id: reservation_id.into(),
            table_ids,
        }
    }

    /// Convenience for the single-table case
    pub fn single(reservation_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self::new(reservation_id, vec![table_id.into()])
    }
}

/// Check-in request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub reservation_id: String,
}
