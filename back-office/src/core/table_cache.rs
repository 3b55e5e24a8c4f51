//! Table code cache
//!
//! Table codes are immutable reference data fetched lazily: the first
//! resolve for an id triggers a store lookup, concurrent resolves of the
//! same in-flight id share that lookup, and a resolved code is kept for the
//! rest of the session. A failed lookup is not cached; a later resolve
//! retries. Display falls back to a truncated-id placeholder while a code
//! is unresolved.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use booking_client::BookingApi;
use shared::models::Reservation;

/// Lookup failed; the cell stays empty so a later resolve retries
struct Unresolved;

/// Session cache mapping table id to display code
pub struct TableCodeCache {
    client: Arc<dyn BookingApi>,
    entries: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl TableCodeCache {
    pub fn new(client: Arc<dyn BookingApi>) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, table_id: &str) -> Arc<OnceCell<String>> {
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry(table_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Resolve the code for a table, fetching on first use
    ///
    /// Concurrent callers for the same id await a single underlying fetch
    /// and observe the same code. Returns `None` when the lookup fails.
    pub async fn resolve(&self, table_id: &str) -> Option<String> {
        let cell = self.cell(table_id);

        let result = cell
            .get_or_try_init(|| async {
                match self.client.get_table(table_id).await {
                    Ok(resp) if resp.success => match resp.result {
                        Some(table) => {
                            tracing::debug!(table_id = %table_id, code = %table.code, "Table code resolved");
                            Ok(table.code)
                        }
                        None => Err(Unresolved),
                    },
                    Ok(resp) => {
                        tracing::debug!(
                            table_id = %table_id,
                            message = resp.message_or("no message"),
                            "Table lookup rejected"
                        );
                        Err(Unresolved)
                    }
                    Err(e) => {
                        tracing::warn!(table_id = %table_id, error = %e, "Table lookup failed");
                        Err(Unresolved)
                    }
                }
            })
            .await;

        result.ok().cloned()
    }

    /// Non-blocking read of an already resolved code
    pub fn peek(&self, table_id: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(table_id).and_then(|cell| cell.get().cloned())
    }

    /// Truncated-id placeholder shown while a code is unresolved
    pub fn placeholder(table_id: &str) -> String {
        table_id.chars().take(4).collect()
    }

    /// Resolved code, or the placeholder
    pub fn label(&self, table_id: &str) -> String {
        self.peek(table_id)
            .unwrap_or_else(|| Self::placeholder(table_id))
    }

    /// Warm the cache for every assignment on the given rows
    ///
    /// Lookup failures degrade to placeholders and never block the page.
    pub async fn prime(&self, reservations: &[Reservation]) {
        for reservation in reservations {
            for assignment in &reservation.table_assignments {
                let _ = self.resolve(&assignment.table_id).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_client::{MemoryBookingStore, StoreOp};
    use shared::models::{DiningTable, TableStatus};
    use std::time::Duration;

    fn table(id: &str, code: &str) -> DiningTable {
        DiningTable {
            id: id.to_string(),
            code: code.to_string(),
            zone_id: "zone-1".to_string(),
            status: TableStatus::Opening,
        }
    }

    #[tokio::test]
    async fn test_resolve_memoizes() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("tbl-abcdef", "A7"));
        let cache = TableCodeCache::new(Arc::new(store.clone()));

        assert_eq!(cache.resolve("tbl-abcdef").await.as_deref(), Some("A7"));
        assert_eq!(cache.resolve("tbl-abcdef").await.as_deref(), Some("A7"));
        assert_eq!(store.calls_of(StoreOp::GetTable).len(), 1);

        assert_eq!(cache.peek("tbl-abcdef").as_deref(), Some("A7"));
        assert_eq!(cache.label("tbl-abcdef"), "A7");
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_fetch() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("tbl-abcdef", "A7"));
        store.set_latency(Duration::from_millis(20));
        let cache = Arc::new(TableCodeCache::new(Arc::new(store.clone())));

        let a = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.resolve("tbl-abcdef").await })
        };
        let b = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.resolve("tbl-abcdef").await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a.as_deref(), Some("A7"));
        assert_eq!(b.as_deref(), Some("A7"));
        assert_eq!(store.calls_of(StoreOp::GetTable).len(), 1);
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let store = MemoryBookingStore::new();
        store.seed_table(table("tbl-abcdef", "A7"));
        store.break_next(StoreOp::GetTable, 1);
        let cache = TableCodeCache::new(Arc::new(store.clone()));

        // First attempt fails; caller falls back to the placeholder
        assert_eq!(cache.resolve("tbl-abcdef").await, None);
        assert_eq!(cache.label("tbl-abcdef"), "tbl-");

        // Retry succeeds and is memoized
        assert_eq!(cache.resolve("tbl-abcdef").await.as_deref(), Some("A7"));
        assert_eq!(store.calls_of(StoreOp::GetTable).len(), 2);
    }

    #[test]
    fn test_placeholder_truncates() {
        assert_eq!(TableCodeCache::placeholder("tbl-123456"), "tbl-");
        assert_eq!(TableCodeCache::placeholder("ab"), "ab");
    }
}
