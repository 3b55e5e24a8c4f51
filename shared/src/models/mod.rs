//! Domain models shared by the client and console crates

mod dining_table;
mod reservation;

pub use dining_table::{DiningTable, TableStatus};
pub use reservation::{
    CheckInRequest, CreateBookingData, PriorityTier, Reservation, ReservationStatus,
    ReservationsResult, TableAssignment, TableAssignmentRequest, UpdateReservationData,
};
