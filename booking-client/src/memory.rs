//! In-process reservation store
//!
//! A [`BookingApi`] implementation backed by plain in-memory state, used by
//! the console's tests and the interactive demo. It enforces the store-side
//! rules (status transitions, no double-booking, cancel blocked while tables
//! are bound) so callers exercise the same failure paths the real store
//! produces, and it records every call so tests can assert ordering.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::{ClientError, ClientResult};
use shared::models::{
    CreateBookingData, DiningTable, PriorityTier, Reservation, ReservationStatus,
    ReservationsResult, TableAssignment, TableAssignmentRequest, TableStatus,
    UpdateReservationData,
};
use shared::response::{ApiResponse, Empty};

use crate::http::BookingApi;

/// Store operation kinds, used for call recording and failure scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Update,
    Confirm,
    Cancel,
    Assign,
    Unassign,
    CheckIn,
    Create,
    GetTable,
}

/// One recorded store call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub op: StoreOp,
    pub reservation_id: Option<String>,
    pub table_ids: Vec<String>,
}

#[derive(Default)]
struct Inner {
    reservations: Vec<Reservation>,
    tables: HashMap<String, DiningTable>,
    calls: Vec<CallRecord>,
    /// Scripted business rejections, popped per call
    rejections: HashMap<StoreOp, VecDeque<String>>,
    /// Scripted transport failures, popped per call
    outages: HashMap<StoreOp, u32>,
    latency: Option<Duration>,
}

/// In-memory reservation store
#[derive(Clone, Default)]
pub struct MemoryBookingStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding ====================

    /// Add a table to the store
    pub fn seed_table(&self, table: DiningTable) {
        let mut inner = self.inner.lock().unwrap();
        inner.tables.insert(table.id.clone(), table);
    }

    /// Add a reservation to the store
    pub fn seed_reservation(&self, reservation: Reservation) {
        let mut inner = self.inner.lock().unwrap();
        inner.reservations.push(reservation);
    }

    /// Current status of a reservation, if it exists
    pub fn status_of(&self, id: &str) -> Option<ReservationStatus> {
        let inner = self.inner.lock().unwrap();
        inner
            .reservations
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }

    // ==================== Test scripting ====================

    /// Make the next call of `op` answer a business rejection
    pub fn reject_next(&self, op: StoreOp, message: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        inner.rejections.entry(op).or_default().push_back(message.into());
    }

    /// Make the next `count` calls of `op` fail at the transport layer
    pub fn break_next(&self, op: StoreOp, count: u32) {
        let mut inner = self.inner.lock().unwrap();
        *inner.outages.entry(op).or_insert(0) += count;
    }

    /// Delay every call, emulating an in-flight request
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = Some(latency);
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded calls of a single kind, in order
    pub fn calls_of(&self, op: StoreOp) -> Vec<CallRecord> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    // ==================== Internals ====================

    async fn enter(
        &self,
        op: StoreOp,
        reservation_id: Option<&str>,
        table_ids: &[String],
    ) -> Result<Option<String>, ClientError> {
        let latency = self.inner.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(CallRecord {
            op,
            reservation_id: reservation_id.map(str::to_string),
            table_ids: table_ids.to_vec(),
        });

        if let Some(count) = inner.outages.get_mut(&op)
            && *count > 0
        {
            *count -= 1;
            return Err(ClientError::Internal("injected transport failure".into()));
        }

        Ok(inner
            .rejections
            .get_mut(&op)
            .and_then(|queue| queue.pop_front()))
    }
}

#[async_trait]
impl BookingApi for MemoryBookingStore {
    async fn list_reservations(&self) -> ClientResult<ApiResponse<ReservationsResult>> {
        if let Some(msg) = self.enter(StoreOp::List, None, &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let inner = self.inner.lock().unwrap();
        let items = inner.reservations.clone();
        let total = items.len() as u64;
        Ok(ApiResponse::ok(ReservationsResult {
            items,
            total_count: total,
        }))
    }

    async fn update_reservation(
        &self,
        data: &UpdateReservationData,
    ) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self.enter(StoreOp::Update, Some(&data.id), &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.iter_mut().find(|r| r.id == data.id) else {
            return Ok(ApiResponse::error("Reservation not found"));
        };
        if reservation.status.is_terminal() {
            return Ok(ApiResponse::error("Reservation can no longer be edited"));
        }
        reservation.booking_date = data.booking_date;
        reservation.guest_count = data.guest_count;
        Ok(ApiResponse::ok(Empty))
    }

    async fn confirm_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self.enter(StoreOp::Confirm, Some(id), &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.iter_mut().find(|r| r.id == id) else {
            return Ok(ApiResponse::error("Reservation not found"));
        };
        if !reservation.status.can_confirm() {
            return Ok(ApiResponse::error(
                "Only a new reservation can be confirmed",
            ));
        }
        reservation.status = ReservationStatus::Confirmed;
        Ok(ApiResponse::ok(Empty))
    }

    async fn cancel_reservation(&self, id: &str) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self.enter(StoreOp::Cancel, Some(id), &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner.reservations.iter_mut().find(|r| r.id == id) else {
            return Ok(ApiResponse::error("Reservation not found"));
        };
        if !reservation.status.can_cancel() {
            return Ok(ApiResponse::error("Reservation can no longer be cancelled"));
        }
        // Assigned tables must be released first; cancelling around them
        // would leave the bindings dangling
        if reservation.has_tables_assigned() {
            return Ok(ApiResponse::error("Reservation still has assigned tables"));
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(ApiResponse::ok(Empty))
    }

    async fn assign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self
            .enter(StoreOp::Assign, Some(&req.reservation_id), &req.table_ids)
            .await?
        {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;

        for table_id in &req.table_ids {
            if !inner.tables.contains_key(table_id) {
                return Ok(ApiResponse::error(format!("Table {} not found", table_id)));
            }
            let taken = inner.reservations.iter().any(|r| {
                r.id != req.reservation_id
                    && r.status != ReservationStatus::Cancelled
                    && r.table_assignments.iter().any(|ta| &ta.table_id == table_id)
            });
            if taken {
                return Ok(ApiResponse::error(format!(
                    "Table {} is already reserved",
                    table_id
                )));
            }
        }

        let Some(reservation) = inner
            .reservations
            .iter_mut()
            .find(|r| r.id == req.reservation_id)
        else {
            return Ok(ApiResponse::error("Reservation not found"));
        };
        if reservation.status != ReservationStatus::Confirmed {
            return Ok(ApiResponse::error(
                "Reservation must be confirmed before assigning tables",
            ));
        }
        for table_id in &req.table_ids {
            if reservation
                .table_assignments
                .iter()
                .any(|ta| &ta.table_id == table_id)
            {
                continue;
            }
            reservation.table_assignments.push(TableAssignment {
                table_id: table_id.clone(),
                reservation_id: req.reservation_id.clone(),
            });
        }
        for table_id in &req.table_ids {
            if let Some(table) = inner.tables.get_mut(table_id) {
                table.status = TableStatus::Booked;
            }
        }
        Ok(ApiResponse::ok(Empty))
    }

    async fn unassign_tables(
        &self,
        req: &TableAssignmentRequest,
    ) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self
            .enter(StoreOp::Unassign, Some(&req.reservation_id), &req.table_ids)
            .await?
        {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        let Some(reservation) = inner
            .reservations
            .iter_mut()
            .find(|r| r.id == req.reservation_id)
        else {
            return Ok(ApiResponse::error("Reservation not found"));
        };

        for table_id in &req.table_ids {
            if !reservation
                .table_assignments
                .iter()
                .any(|ta| &ta.table_id == table_id)
            {
                return Ok(ApiResponse::error(format!(
                    "Table {} is not assigned to this reservation",
                    table_id
                )));
            }
        }
        reservation
            .table_assignments
            .retain(|ta| !req.table_ids.contains(&ta.table_id));

        for table_id in &req.table_ids {
            if let Some(table) = inner.tables.get_mut(table_id) {
                table.status = TableStatus::Opening;
            }
        }
        Ok(ApiResponse::ok(Empty))
    }

    async fn check_in(&self, reservation_id: &str) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self
            .enter(StoreOp::CheckIn, Some(reservation_id), &[])
            .await?
        {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let Some(reservation) = inner
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
        else {
            return Ok(ApiResponse::error("Reservation not found"));
        };
        if !reservation.status.can_check_in() {
            return Ok(ApiResponse::error(
                "Only a confirmed reservation can be checked in",
            ));
        }
        if !reservation.has_tables_assigned() {
            return Ok(ApiResponse::error(
                "Assign a table before checking the party in",
            ));
        }
        reservation.status = ReservationStatus::Checkedin;
        Ok(ApiResponse::ok(Empty))
    }

    async fn create_booking(&self, data: &CreateBookingData) -> ClientResult<ApiResponse<Empty>> {
        if let Some(msg) = self.enter(StoreOp::Create, None, &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let mut inner = self.inner.lock().unwrap();
        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            customer_name: data.customer_name.clone(),
            phone_number: data.phone_number.clone(),
            guest_count: data.number_of_people,
            booking_date: data.booking_date,
            priority: PriorityTier::Standard,
            status: ReservationStatus::Created,
            table_assignments: Vec::new(),
        };
        inner.reservations.push(reservation);
        Ok(ApiResponse::ok(Empty))
    }

    async fn get_table(&self, table_id: &str) -> ClientResult<ApiResponse<DiningTable>> {
        if let Some(msg) = self.enter(StoreOp::GetTable, None, &[]).await? {
            return Ok(ApiResponse::error(msg));
        }

        let inner = self.inner.lock().unwrap();
        match inner.tables.get(table_id) {
            Some(table) => Ok(ApiResponse::ok(table.clone())),
            None => Ok(ApiResponse::error(format!("Table {} not found", table_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reservation(id: &str, status: ReservationStatus, table_ids: &[&str]) -> Reservation {
        Reservation {
            id: id.to_string(),
            customer_name: "Nguyen Van A".to_string(),
            phone_number: "0900000000".to_string(),
            guest_count: 2,
            booking_date: Utc::now(),
            priority: PriorityTier::Standard,
            status,
            table_assignments: table_ids
                .iter()
                .map(|t| TableAssignment {
                    table_id: t.to_string(),
                    reservation_id: id.to_string(),
                })
                .collect(),
        }
    }

    fn table(id: &str, code: &str) -> DiningTable {
        DiningTable {
            id: id.to_string(),
            code: code.to_string(),
            zone_id: "zone-1".to_string(),
            status: TableStatus::Opening,
        }
    }

    #[tokio::test]
    async fn test_confirm_only_from_created() {
        let store = MemoryBookingStore::new();
        store.seed_reservation(reservation("r1", ReservationStatus::Created, &[]));
        store.seed_reservation(reservation("r2", ReservationStatus::Confirmed, &[]));

        let ok = store.confirm_reservation("r1").await.unwrap();
        assert!(ok.success);
        assert_eq!(store.status_of("r1"), Some(ReservationStatus::Confirmed));

        let rejected = store.confirm_reservation("r2").await.unwrap();
        assert!(!rejected.success);
        assert_eq!(store.status_of("r2"), Some(ReservationStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_cancel_blocked_while_tables_bound() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("t1", "A1"));
        store.seed_reservation(reservation("r1", ReservationStatus::Confirmed, &["t1"]));

        let rejected = store.cancel_reservation("r1").await.unwrap();
        assert!(!rejected.success);
        assert_eq!(
            rejected.message_or(""),
            "Reservation still has assigned tables"
        );

        let req = TableAssignmentRequest::single("r1", "t1");
        assert!(store.unassign_tables(&req).await.unwrap().success);
        assert!(store.cancel_reservation("r1").await.unwrap().success);
        assert_eq!(store.status_of("r1"), Some(ReservationStatus::Cancelled));
    }

    #[tokio::test]
    async fn test_double_booking_rejected() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("t1", "A1"));
        store.seed_reservation(reservation("r1", ReservationStatus::Confirmed, &["t1"]));
        store.seed_reservation(reservation("r2", ReservationStatus::Confirmed, &[]));

        let req = TableAssignmentRequest::single("r2", "t1");
        let rejected = store.assign_tables(&req).await.unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.message_or(""), "Table t1 is already reserved");
    }

    #[tokio::test]
    async fn test_scripted_rejection_and_outage() {
        let store = MemoryBookingStore::new();
        store.seed_reservation(reservation("r1", ReservationStatus::Created, &[]));

        store.reject_next(StoreOp::Confirm, "maintenance window");
        let rejected = store.confirm_reservation("r1").await.unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.message_or(""), "maintenance window");

        store.break_next(StoreOp::Confirm, 1);
        assert!(store.confirm_reservation("r1").await.is_err());

        // Third attempt goes through
        assert!(store.confirm_reservation("r1").await.unwrap().success);
        assert_eq!(store.calls_of(StoreOp::Confirm).len(), 3);
    }

    #[tokio::test]
    async fn test_check_in_requires_assigned_table() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("t1", "A1"));
        store.seed_reservation(reservation("r1", ReservationStatus::Confirmed, &[]));

        let rejected = store.check_in("r1").await.unwrap();
        assert!(!rejected.success);

        let req = TableAssignmentRequest::single("r1", "t1");
        assert!(store.assign_tables(&req).await.unwrap().success);
        assert!(store.check_in("r1").await.unwrap().success);
        assert_eq!(store.status_of("r1"), Some(ReservationStatus::Checkedin));
    }
}
