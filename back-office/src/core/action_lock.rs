//! Per-entity action locks
//!
//! Every mutating operation is keyed by `"{entity_id}-{kind}"`. While the
//! key is held, re-entry for the same key is rejected and the UI disables
//! the triggering control; operations on other keys are unaffected. Exactly
//! one network round trip per key is in flight at a time.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

/// Operation kinds participating in the lock discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Confirm,
    Cancel,
    Assign,
    Unassign,
    CheckIn,
    Update,
    Create,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm => write!(f, "confirm"),
            Self::Cancel => write!(f, "cancel"),
            Self::Assign => write!(f, "assign"),
            Self::Unassign => write!(f, "unassign"),
            Self::CheckIn => write!(f, "check-in"),
            Self::Update => write!(f, "update"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Registry of currently held action locks
#[derive(Debug, Clone, Default)]
pub struct ActionLockRegistry {
    locks: Arc<DashMap<String, ()>>,
}

impl ActionLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(entity_id: &str, kind: ActionKind) -> String {
        format!("{}-{}", entity_id, kind)
    }

    /// Acquire the lock for `(entity_id, kind)`
    ///
    /// Returns `None` when the key is already held. The returned guard
    /// releases the key on drop, so every exit path clears the lock.
    pub fn try_acquire(&self, entity_id: &str, kind: ActionKind) -> Option<ActionLockGuard> {
        let key = Self::key(entity_id, kind);
        match self.locks.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(key = %key, "Action already in flight, suppressed");
                None
            }
            Entry::Vacant(entry) => {
                entry.insert(());
                Some(ActionLockGuard {
                    locks: self.locks.clone(),
                    key,
                })
            }
        }
    }

    /// Whether `(entity_id, kind)` is currently held
    pub fn is_locked(&self, entity_id: &str, kind: ActionKind) -> bool {
        self.locks.contains_key(&Self::key(entity_id, kind))
    }
}

/// Held action lock; releases its key on drop
#[derive(Debug)]
pub struct ActionLockGuard {
    locks: Arc<DashMap<String, ()>>,
    key: String,
}

impl Drop for ActionLockGuard {
    fn drop(&mut self) {
        self.locks.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentry_rejected_while_held() {
        let registry = ActionLockRegistry::new();

        let guard = registry.try_acquire("res-1", ActionKind::Confirm);
        assert!(guard.is_some());
        assert!(registry.is_locked("res-1", ActionKind::Confirm));

        // Same key: suppressed
        assert!(registry.try_acquire("res-1", ActionKind::Confirm).is_none());

        // Different entity or kind: unaffected
        assert!(registry.try_acquire("res-2", ActionKind::Confirm).is_some());
        assert!(registry.try_acquire("res-1", ActionKind::Cancel).is_some());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = ActionLockRegistry::new();

        {
            let _guard = registry.try_acquire("res-1", ActionKind::Cancel).unwrap();
            assert!(registry.is_locked("res-1", ActionKind::Cancel));
        }

        assert!(!registry.is_locked("res-1", ActionKind::Cancel));
        assert!(registry.try_acquire("res-1", ActionKind::Cancel).is_some());
    }
}
