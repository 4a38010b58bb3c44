//! Per-Key Lock Registry
//!
//! Hands out one reader-writer lock per key, layered under the shard lock.
//! Locks are created lazily the first time a key is touched and are never
//! removed, so the registry grows with the number of distinct keys seen.
//!
//! The registry mutex only guards the map itself. It is released before
//! the caller acquires the returned key lock, so unrelated keys never
//! serialize on it for longer than a map lookup.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A shared handle to the lock for a single key.
pub type KeyLock = Arc<RwLock<()>>;

/// Registry of per-key reader-writer locks.
#[derive(Debug, Default)]
pub struct KeyLockRegistry {
    locks: Mutex<HashMap<String, KeyLock>>,
}

impl KeyLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `key`, creating it if this is the first access.
    ///
    /// Repeated calls for the same key return handles to the same lock.
    pub fn lock_for(&self, key: &str) -> KeyLock {
        let mut locks = self.locks.lock();
        if let Some(lock) = locks.get(key) {
            return Arc::clone(lock);
        }
        let lock = KeyLock::default();
        locks.insert(key.to_owned(), Arc::clone(&lock));
        lock
    }

    /// Number of keys that currently have a lock.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_lock_for_is_idempotent() {
        let registry = KeyLockRegistry::new();

        let a = registry.lock_for("key");
        let b = registry.lock_for("key");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_locks() {
        let registry = KeyLockRegistry::new();

        let a = registry.lock_for("a");
        let b = registry.lock_for("b");

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);

        // Holding one key's lock must not block the other
        let _guard = a.write();
        assert!(b.try_write().is_some());
    }

    #[test]
    fn test_registry_grows_monotonically() {
        let registry = KeyLockRegistry::new();
        assert!(registry.is_empty());

        for i in 0..10 {
            registry.lock_for(&format!("key{}", i));
        }
        for i in 0..10 {
            registry.lock_for(&format!("key{}", i));
        }

        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn test_registry_guard_not_held_across_key_lock() {
        let registry = Arc::new(KeyLockRegistry::new());

        let held = registry.lock_for("busy");
        let guard = held.write();

        // Another thread can still reach the registry for a different key
        let other = Arc::clone(&registry);
        let handle = thread::spawn(move || {
            let lock = other.lock_for("free");
            let _g = lock.write();
        });

        handle.join().unwrap();
        drop(guard);
    }

    #[test]
    fn test_same_key_lock_serializes_holders() {
        let registry = Arc::new(KeyLockRegistry::new());
        let lock = registry.lock_for("shared");
        let guard = lock.write();

        let other = Arc::clone(&registry);
        let handle = thread::spawn(move || {
            let lock = other.lock_for("shared");
            let _g = lock.write();
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());

        drop(guard);
        handle.join().unwrap();
    }
}
