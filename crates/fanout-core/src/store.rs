//! In-memory keyed store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Unbounded `String -> V` map behind a single reader/writer lock.
///
/// - readers share the lock, writers take it exclusively
/// - `set` is an upsert; under concurrent writers the last one wins
/// - no eviction, no capacity bound, no TTL
pub struct KeyValueStore<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> KeyValueStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `key`. `None` means it was never set.
    pub fn get(&self, key: &str) -> Option<V> {
        self.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.write().insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A writer can only panic before or after the single insert, so the map
    // is always consistent and a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for KeyValueStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
