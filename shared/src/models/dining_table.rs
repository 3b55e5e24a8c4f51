//! Dining table model

use serde::{Deserialize, Serialize};

/// Operational status of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableStatus {
    Opening,
    Closed,
    Locked,
    Booked,
}

/// Dining table entity
///
/// Table codes are immutable reference data; the console caches them per
/// session and never invalidates within the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: String,
    /// Short human-readable code shown on badges (e.g. "A12")
    pub code: String,
    pub zone_id: String,
    pub status: TableStatus,
}
