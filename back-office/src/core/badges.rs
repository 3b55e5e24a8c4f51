//! Table badge derivation
//!
//! Pure projection of a reservation's assignments into the badge strip shown
//! on its row. Reads only already-resolved codes (`peek`); unresolved ids
//! fall back to the truncated-id placeholder.

use shared::models::{Reservation, ReservationStatus};

use super::table_cache::TableCodeCache;

/// How many table badges are shown before the overflow count
pub const MAX_VISIBLE_BADGES: usize = 2;

/// Badge strip for a reservation row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBadges {
    /// No tables and the reservation is cancelled
    Cancelled,
    /// No tables assigned yet
    Unassigned,
    /// One or more assigned tables
    Assigned {
        /// Up to [`MAX_VISIBLE_BADGES`] labels, sorted
        visible: Vec<String>,
        /// How many further tables hide behind the "+N" badge
        overflow: usize,
        /// Every label in sorted order (the tooltip content)
        all: Vec<String>,
    },
}

/// Derive the badge strip for a reservation
pub fn table_badges(reservation: &Reservation, cache: &TableCodeCache) -> TableBadges {
    if reservation.table_assignments.is_empty() {
        if reservation.status == ReservationStatus::Cancelled {
            return TableBadges::Cancelled;
        }
        return TableBadges::Unassigned;
    }

    let mut labels: Vec<String> = reservation
        .table_assignments
        .iter()
        .map(|ta| cache.label(&ta.table_id))
        .collect();
    labels.sort();

    let visible: Vec<String> = labels.iter().take(MAX_VISIBLE_BADGES).cloned().collect();
    let overflow = labels.len().saturating_sub(MAX_VISIBLE_BADGES);

    TableBadges::Assigned {
        visible,
        overflow,
        all: labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_client::MemoryBookingStore;
    use chrono::Utc;
    use shared::models::{DiningTable, PriorityTier, TableAssignment, TableStatus};
    use std::sync::Arc;

    fn reservation(status: ReservationStatus, table_ids: &[&str]) -> Reservation {
        Reservation {
            id: "res-1".to_string(),
            customer_name: "Nguyen Van A".to_string(),
            phone_number: "0900000000".to_string(),
            guest_count: 4,
            booking_date: Utc::now(),
            priority: PriorityTier::Standard,
            status,
            table_assignments: table_ids
                .iter()
                .map(|t| TableAssignment {
                    table_id: t.to_string(),
                    reservation_id: "res-1".to_string(),
                })
                .collect(),
        }
    }

    fn cache_with(tables: &[(&str, &str)]) -> TableCodeCache {
        let store = MemoryBookingStore::new();
        for (id, code) in tables {
            store.seed_table(DiningTable {
                id: id.to_string(),
                code: code.to_string(),
                zone_id: "zone-1".to_string(),
                status: TableStatus::Opening,
            });
        }
        TableCodeCache::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_zero_tables() {
        let cache = cache_with(&[]);
        assert_eq!(
            table_badges(&reservation(ReservationStatus::Created, &[]), &cache),
            TableBadges::Unassigned
        );
        assert_eq!(
            table_badges(&reservation(ReservationStatus::Cancelled, &[]), &cache),
            TableBadges::Cancelled
        );
    }

    #[tokio::test]
    async fn test_single_table_resolved_and_placeholder() {
        let cache = cache_with(&[("tbl-9999", "B2")]);
        let r = reservation(ReservationStatus::Confirmed, &["tbl-9999"]);

        // Unresolved: placeholder of the first 4 id characters
        assert_eq!(
            table_badges(&r, &cache),
            TableBadges::Assigned {
                visible: vec!["tbl-".to_string()],
                overflow: 0,
                all: vec!["tbl-".to_string()],
            }
        );

        cache.resolve("tbl-9999").await;
        assert_eq!(
            table_badges(&r, &cache),
            TableBadges::Assigned {
                visible: vec!["B2".to_string()],
                overflow: 0,
                all: vec!["B2".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_three_tables_two_visible_plus_overflow() {
        let cache = cache_with(&[("t-a", "C3"), ("t-b", "A1"), ("t-c", "B2")]);
        for id in ["t-a", "t-b", "t-c"] {
            cache.resolve(id).await;
        }

        let r = reservation(ReservationStatus::Confirmed, &["t-a", "t-b", "t-c"]);
        let badges = table_badges(&r, &cache);

        assert_eq!(
            badges,
            TableBadges::Assigned {
                visible: vec!["A1".to_string(), "B2".to_string()],
                overflow: 1,
                all: vec!["A1".to_string(), "B2".to_string(), "C3".to_string()],
            }
        );
    }
}
