//! Memory Store Module
//!
//! Concurrent in-memory map from key to record, the authoritative fast path.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::cache::Record;

// == Memory Store ==
/// Internally synchronized key to record map.
///
/// Every key holds its own copy of the record; there is no aliasing between
/// keys written by the same `set`.
#[derive(Debug)]
pub struct MemoryStore<T> {
    entries: DashMap<String, Record<T>>,
}

impl<T> MemoryStore<T> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    // == Store ==
    /// Inserts or replaces the record for `key`.
    pub fn store(&self, key: &str, record: Record<T>) {
        self.entries.insert(key.to_string(), record);
    }

    // == Delete ==
    /// Removes the record for `key`. Returns true if one was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Delete If Expired ==
    /// Removes the record for `key` only if it has expired.
    ///
    /// `evicted` runs before the removal while the entry is still locked, so
    /// a concurrent `store` for the same key waits for it and is never lost.
    /// Returns true if a record was removed.
    pub fn delete_if_expired(&self, key: &str, evicted: impl FnOnce()) -> bool {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) if entry.get().is_expired() => {
                evicted();
                entry.remove();
                true
            }
            _ => false,
        }
    }

    // == For Each ==
    /// Visits every entry. No snapshot is taken: entries inserted or removed
    /// concurrently may or may not be visited.
    ///
    /// The visitor must not call back into this store.
    pub fn for_each(&self, mut visit: impl FnMut(&str, &Record<T>)) {
        for entry in self.entries.iter() {
            visit(entry.key(), entry.value());
        }
    }

    // == Clear ==
    /// Removes every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut keys = Vec::with_capacity(self.entries.len());
        self.for_each(|key, _| keys.push(key.to_string()));

        keys.iter().filter(|key| self.delete(key)).count()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> MemoryStore<T> {
    // == Load ==
    /// Returns a copy of the record for `key`, if any.
    pub fn load(&self, key: &str) -> Option<Record<T>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store: MemoryStore<String> = MemoryStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_and_load() {
        let store = MemoryStore::new();

        store.store("key1", Record::permanent("value1".to_string()));
        let record = store.load("key1").unwrap();

        assert_eq!(record.item, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_nonexistent() {
        let store: MemoryStore<String> = MemoryStore::new();
        assert!(store.load("nonexistent").is_none());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();

        store.store("key1", Record::permanent("value1".to_string()));
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));

        assert!(store.is_empty());
        assert!(store.load("key1").is_none());
    }

    #[test]
    fn test_delete_if_expired_removes_expired() {
        let store = MemoryStore::new();
        store.store(
            "key1",
            Record {
                item: "stale".to_string(),
                expiration: 1,
            },
        );

        let mut evicted = false;
        assert!(store.delete_if_expired("key1", || evicted = true));
        assert!(evicted);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_if_expired_keeps_replacement() {
        let store = MemoryStore::new();
        store.store(
            "key1",
            Record {
                item: "stale".to_string(),
                expiration: 1,
            },
        );
        // A writer replaced the expired record before the eviction ran.
        store.store("key1", Record::permanent("fresh".to_string()));

        let mut evicted = false;
        assert!(!store.delete_if_expired("key1", || evicted = true));
        assert!(!evicted);
        assert_eq!(store.load("key1").unwrap().item, "fresh");
    }

    #[test]
    fn test_delete_if_expired_missing_key() {
        let store: MemoryStore<String> = MemoryStore::new();

        assert!(!store.delete_if_expired("nothing", || panic!("nothing to evict")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite() {
        let store = MemoryStore::new();

        store.store("key1", Record::permanent("value1".to_string()));
        store.store("key1", Record::new("value2".to_string(), Duration::from_secs(60)));

        let record = store.load("key1").unwrap();
        assert_eq!(record.item, "value2");
        assert!(record.expires_at().is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_for_each_visits_all() {
        let store = MemoryStore::new();
        store.store("a", Record::permanent(1));
        store.store("b", Record::permanent(2));

        let mut sum = 0;
        store.for_each(|_, record| sum += record.item);
        assert_eq!(sum, 3);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store.store(&format!("key{i}"), Record::permanent(i));
        }

        assert_eq!(store.clear(), 10);
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        store.store(&format!("{t}-{i}"), Record::permanent(i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
    }
}
