//! Reservation back-office console
//!
//! The lifecycle core sitting between the operator and the reservation
//! store: a list controller that sequences confirm/cancel/assign operations
//! with per-entity action locks, a session cache for table codes, and a
//! router turning relay pushes into operator alerts.

pub mod config;
pub mod core;
pub mod logger;
pub mod relay_router;

pub use config::AppConfig;
pub use crate::core::{
    ActionKind, ActionLockRegistry, ActionOutcome, BookingController, Paginator, RowActions,
    TableBadges, TableCodeCache, TableSelection,
};
pub use relay_router::{Screen, UiAlert};
