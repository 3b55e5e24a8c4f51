//! Reservation list controller
//!
//! Holds the current reservation list, derives per-row affordances from
//! status, and sequences multi-step operations against the store. Two rules
//! shape everything here:
//!
//! - the local list is never authoritative: every mutating action ends with
//!   a full re-fetch, whatever its outcome;
//! - at most one operation per `(entity, kind)` key is in flight, enforced
//!   by the action-lock registry.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use booking_client::{BookingApi, ClientError, ClientResult};
use shared::models::{
    CreateBookingData, Reservation, ReservationStatus, TableAssignmentRequest,
    UpdateReservationData,
};
use shared::response::ApiResponse;

use super::action_lock::{ActionKind, ActionLockRegistry};
use super::badges::{TableBadges, table_badges};
use super::pagination::Paginator;
use super::table_cache::TableCodeCache;

/// Fallback message for transport-level failures
const GENERIC_FAILURE: &str = "Something went wrong, please try again";

/// Outcome of a controller operation, ready for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The store accepted the operation
    Completed { message: String },
    /// The store rejected the operation; the message is the store's own
    Rejected { message: String },
    /// Transport failure before the store answered
    Failed { message: String },
    /// No response within the request timeout; the lock was released
    TimedOut,
    /// The same `(entity, kind)` operation is already in flight
    AlreadyInFlight,
    /// The row no longer offers this action
    NotAllowed { message: String },
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Which tables to release in an unassign operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelection {
    /// Every currently assigned table
    All,
    /// An explicit subset
    Tables(Vec<String>),
}

/// Per-row affordances derived from status and lock state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowActions {
    pub can_confirm: bool,
    pub can_cancel: bool,
    pub can_edit: bool,
    pub can_assign_tables: bool,
    pub can_check_in: bool,
    pub can_unassign: bool,
    pub confirm_in_flight: bool,
    pub cancel_in_flight: bool,
    pub assign_in_flight: bool,
    pub unassign_in_flight: bool,
    pub check_in_in_flight: bool,
}

#[derive(Default)]
struct ListState {
    rows: Vec<Reservation>,
    loading: bool,
}

enum CallResult<T> {
    Answered(ApiResponse<T>),
    Transport(ClientError),
    TimedOut,
}

/// The reservation list controller
pub struct BookingController {
    client: Arc<dyn BookingApi>,
    locks: ActionLockRegistry,
    cache: TableCodeCache,
    state: Mutex<ListState>,
    paginator: Mutex<Paginator>,
    request_timeout: Duration,
}

impl BookingController {
    pub fn new(client: Arc<dyn BookingApi>, request_timeout: Duration) -> Self {
        Self {
            cache: TableCodeCache::new(client.clone()),
            client,
            locks: ActionLockRegistry::new(),
            state: Mutex::new(ListState::default()),
            paginator: Mutex::new(Paginator::default()),
            request_timeout,
        }
    }

    // ==================== List state ====================

    /// Re-fetch the full list from the store and replace the local rows
    ///
    /// This is the only way local state changes after a mutation; rows are
    /// never patched optimistically.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
        }

        let result = self.client.list_reservations().await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;

        match result {
            Ok(resp) if resp.success => {
                let rows = resp.result.map(|r| r.items).unwrap_or_default();
                let count = rows.len();
                state.rows = rows;
                self.paginator.lock().unwrap().set_total(count);

                let page_rows: Vec<Reservation> = {
                    let pager = self.paginator.lock().unwrap();
                    pager.slice(&state.rows).to_vec()
                };
                drop(state);

                // Warm table codes for the visible page; failures degrade
                // to placeholders
                self.cache.prime(&page_rows).await;

                tracing::debug!(rows = count, "Reservation list refreshed");
                Ok(count)
            }
            Ok(resp) => Err(ClientError::Internal(
                resp.message_or("List request rejected").to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Refresh after a mutation; a failure here only logs, the operation
    /// outcome is already decided
    async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Post-action refresh failed");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// All fetched rows
    pub fn rows(&self) -> Vec<Reservation> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Rows of the current page
    pub fn current_page(&self) -> Vec<Reservation> {
        let state = self.state.lock().unwrap();
        let pager = self.paginator.lock().unwrap();
        pager.slice(&state.rows).to_vec()
    }

    fn reservation(&self, id: &str) -> Option<Reservation> {
        self.state
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    // ==================== Pagination ====================

    pub fn go_to_page(&self, page: usize) {
        self.paginator.lock().unwrap().go_to_page(page);
    }

    pub fn set_page_size(&self, page_size: usize) -> bool {
        self.paginator.lock().unwrap().set_page_size(page_size)
    }

    /// Current page and page count
    pub fn page_info(&self) -> (usize, usize) {
        let pager = self.paginator.lock().unwrap();
        (pager.page(), pager.total_pages())
    }

    // ==================== Row projections ====================

    /// Badge strip for a row
    pub fn badges(&self, reservation: &Reservation) -> TableBadges {
        table_badges(reservation, &self.cache)
    }

    /// The session table-code cache
    pub fn table_codes(&self) -> &TableCodeCache {
        &self.cache
    }

    /// Derive the action set a row currently offers
    pub fn row_actions(&self, reservation: &Reservation) -> RowActions {
        let id = &reservation.id;
        let has_tables = reservation.has_tables_assigned();
        let status = reservation.status;

        let confirm_in_flight = self.locks.is_locked(id, ActionKind::Confirm);
        let cancel_in_flight = self.locks.is_locked(id, ActionKind::Cancel);
        let assign_in_flight = self.locks.is_locked(id, ActionKind::Assign);
        let unassign_in_flight = self.locks.is_locked(id, ActionKind::Unassign);
        let check_in_in_flight = self.locks.is_locked(id, ActionKind::CheckIn);

        RowActions {
            can_confirm: status.can_confirm() && !confirm_in_flight,
            can_cancel: status.can_cancel() && !cancel_in_flight,
            can_edit: status == ReservationStatus::Confirmed,
            can_assign_tables: status == ReservationStatus::Confirmed && !assign_in_flight,
            can_check_in: status.can_check_in() && has_tables && !check_in_in_flight,
            can_unassign: has_tables && !status.is_terminal() && !unassign_in_flight,
            confirm_in_flight,
            cancel_in_flight,
            assign_in_flight,
            unassign_in_flight,
            check_in_in_flight,
        }
    }

    // ==================== Operations ====================

    async fn guarded<T, F>(&self, fut: F) -> CallResult<T>
    where
        F: Future<Output = ClientResult<ApiResponse<T>>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(Ok(resp)) => CallResult::Answered(resp),
            Ok(Err(e)) => CallResult::Transport(e),
            Err(_) => CallResult::TimedOut,
        }
    }

    fn settle<T>(
        &self,
        entity_id: &str,
        kind: ActionKind,
        call: CallResult<T>,
        success_message: String,
    ) -> ActionOutcome {
        match call {
            CallResult::Answered(resp) if resp.success => ActionOutcome::Completed {
                message: success_message,
            },
            CallResult::Answered(resp) => ActionOutcome::Rejected {
                message: resp.message_or(GENERIC_FAILURE).to_string(),
            },
            CallResult::Transport(e) => {
                tracing::error!(entity_id = %entity_id, kind = %kind, error = %e, "Store call failed");
                ActionOutcome::Failed {
                    message: GENERIC_FAILURE.to_string(),
                }
            }
            CallResult::TimedOut => {
                tracing::warn!(entity_id = %entity_id, kind = %kind, "Store call timed out");
                ActionOutcome::TimedOut
            }
        }
    }

    /// Confirm a freshly created reservation
    pub async fn confirm(&self, id: &str) -> ActionOutcome {
        let Some(reservation) = self.reservation(id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        if !reservation.status.can_confirm() {
            return ActionOutcome::NotAllowed {
                message: "Only a new reservation can be confirmed".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(id, ActionKind::Confirm) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let call = self.guarded(self.client.confirm_reservation(id)).await;
        let outcome = self.settle(
            id,
            ActionKind::Confirm,
            call,
            format!("Reservation for {} confirmed", reservation.customer_name),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    /// Cancel a reservation, releasing its tables first
    ///
    /// The cascade: when tables are assigned, all of them are unassigned in
    /// one call before cancel. An unassign failure aborts the whole
    /// cancellation; the reservation keeps its tables and prior status.
    /// Lock release and refresh happen on every path.
    pub async fn cancel(&self, id: &str) -> ActionOutcome {
        let Some(reservation) = self.reservation(id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        if !reservation.status.can_cancel() {
            return ActionOutcome::NotAllowed {
                message: "Reservation can no longer be cancelled".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(id, ActionKind::Cancel) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let outcome = self.cancel_cascade(&reservation).await;

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    async fn cancel_cascade(&self, reservation: &Reservation) -> ActionOutcome {
        let id = &reservation.id;

        // Step 1: release the full set of currently assigned tables
        if reservation.has_tables_assigned() {
            let req = TableAssignmentRequest::new(id.clone(), reservation.table_ids());
            match self.guarded(self.client.unassign_tables(&req)).await {
                CallResult::Answered(resp) if resp.success => {}
                other => {
                    // Abort: cancel is never sent while tables are bound
                    return self.settle(id, ActionKind::Cancel, other, String::new());
                }
            }
        }

        // Step 2: cancel the reservation itself
        let call = self.guarded(self.client.cancel_reservation(id)).await;
        self.settle(
            id,
            ActionKind::Cancel,
            call,
            format!("Reservation for {} cancelled", reservation.customer_name),
        )
    }

    /// Bind tables to a confirmed reservation
    ///
    /// Double-booking is the store's call: a table already held by another
    /// live reservation comes back as a rejection with the store's message.
    pub async fn assign(&self, id: &str, table_ids: Vec<String>) -> ActionOutcome {
        let Some(reservation) = self.reservation(id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        if reservation.status != ReservationStatus::Confirmed {
            return ActionOutcome::NotAllowed {
                message: "Reservation must be confirmed before assigning tables".to_string(),
            };
        }
        if table_ids.is_empty() {
            return ActionOutcome::NotAllowed {
                message: "Select at least one table".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(id, ActionKind::Assign) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let labels: Vec<String> = table_ids.iter().map(|t| self.cache.label(t)).collect();
        let req = TableAssignmentRequest::new(id.to_string(), table_ids);
        let call = self.guarded(self.client.assign_tables(&req)).await;
        let outcome = self.settle(
            id,
            ActionKind::Assign,
            call,
            format!("Assigned table(s) {}", labels.join(", ")),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    /// Release all tables or an explicit subset from a reservation
    pub async fn unassign(&self, id: &str, selection: TableSelection) -> ActionOutcome {
        let Some(reservation) = self.reservation(id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        let table_ids = match selection {
            TableSelection::All => reservation.table_ids(),
            TableSelection::Tables(ids) => ids,
        };
        if table_ids.is_empty() {
            return ActionOutcome::NotAllowed {
                message: "No tables are assigned to this reservation".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(id, ActionKind::Unassign) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let labels: Vec<String> = table_ids.iter().map(|t| self.cache.label(t)).collect();
        let req = TableAssignmentRequest::new(id.to_string(), table_ids);
        let call = self.guarded(self.client.unassign_tables(&req)).await;
        let outcome = self.settle(
            id,
            ActionKind::Unassign,
            call,
            format!("Released table(s) {}", labels.join(", ")),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    /// Check in an arrived party
    ///
    /// Only offered once the reservation is confirmed and holds at least
    /// one table.
    pub async fn check_in(&self, id: &str) -> ActionOutcome {
        let Some(reservation) = self.reservation(id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        if !reservation.status.can_check_in() {
            return ActionOutcome::NotAllowed {
                message: "Reservation must be confirmed first".to_string(),
            };
        }
        if !reservation.has_tables_assigned() {
            return ActionOutcome::NotAllowed {
                message: "Assign a table before checking the party in".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(id, ActionKind::CheckIn) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let call = self.guarded(self.client.check_in(id)).await;
        let outcome = self.settle(
            id,
            ActionKind::CheckIn,
            call,
            format!("Checked in {}", reservation.customer_name),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    /// Update booking date and guest count
    pub async fn update(&self, data: UpdateReservationData) -> ActionOutcome {
        let Some(reservation) = self.reservation(&data.id) else {
            return ActionOutcome::NotAllowed {
                message: "Reservation is no longer listed".to_string(),
            };
        };
        if reservation.status.is_terminal() {
            return ActionOutcome::NotAllowed {
                message: "Reservation can no longer be edited".to_string(),
            };
        }
        let Some(guard) = self.locks.try_acquire(&data.id, ActionKind::Update) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let call = self.guarded(self.client.update_reservation(&data)).await;
        let outcome = self.settle(
            &data.id,
            ActionKind::Update,
            call,
            format!("Reservation for {} updated", reservation.customer_name),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }

    /// Create a reservation on behalf of a caller
    ///
    /// There is no entity id yet, so the lock is keyed by phone number:
    /// double-submitting the same form is suppressed, different callers are
    /// independent.
    pub async fn create(&self, data: CreateBookingData) -> ActionOutcome {
        let Some(guard) = self
            .locks
            .try_acquire(&data.phone_number, ActionKind::Create)
        else {
            return ActionOutcome::AlreadyInFlight;
        };

        let call = self.guarded(self.client.create_booking(&data)).await;
        let outcome = self.settle(
            &data.phone_number,
            ActionKind::Create,
            call,
            format!("Reservation for {} created", data.customer_name),
        );

        drop(guard);
        self.refresh_quietly().await;
        outcome
    }
}
