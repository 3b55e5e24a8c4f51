//! The reservation/table lifecycle core

mod action_lock;
mod badges;
mod controller;
mod pagination;
mod table_cache;

pub use action_lock::{ActionKind, ActionLockGuard, ActionLockRegistry};
pub use badges::{MAX_VISIBLE_BADGES, TableBadges, table_badges};
pub use controller::{ActionOutcome, BookingController, RowActions, TableSelection};
pub use pagination::{PAGE_SIZE_OPTIONS, Paginator};
pub use table_cache::TableCodeCache;
