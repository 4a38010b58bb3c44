//! Thread-Safe Sharded Storage Engine with Expiry Support
//!
//! This module implements the core storage engine for ShardKV.
//! It provides a concurrent string-to-string map with per-key TTL.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: A fixed number of shards, each behind its own `RwLock`.
//! 2. **Per-Key Locks**: An optional registry of key locks layered under the shard lock.
//! 3. **Lazy Expiry**: Keys are checked for expiry on access. There is no background sweep.
//! 4. **Stable Routing**: Keys are routed with FNV-1a, fixed for the lifetime of the store.
//!
//! ## Lock Ordering
//!
//! ```text
//!   acquire:  shard lock ──> key lock
//!   release:  key lock   ──> shard lock
//! ```
//!
//! Every path (set, get, and the expiry removal inside get) follows this
//! order, so the two lock layers can never deadlock against each other.
//!
//! ## Expired Entries
//!
//! A `get` that finds an expired entry drops its shared guards, re-acquires
//! both locks exclusively in the same order, re-checks the entry and removes
//! it from its own shard. A `set` that raced in between wins and its value is
//! returned.

use crate::storage::locks::{KeyLock, KeyLockRegistry};
use crate::storage::router;
use crate::{DEFAULT_REPLICAS, DEFAULT_SHARDS};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Represents a stored value with optional expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The actual value stored
    pub value: String,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry that expires `ttl` from now.
    ///
    /// A TTL too large to represent as an `Instant` yields an entry that
    /// never expires.
    pub fn with_ttl(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Checks if this entry has expired.
    ///
    /// An entry is live only while the current time is strictly before its
    /// expiry, so a zero TTL is expired on creation.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// A single shard containing a portion of the key-value pairs.
#[derive(Debug, Default)]
struct Shard {
    entries: RwLock<HashMap<String, Entry>>,
}

/// Errors raised while constructing a [`Store`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Routing is `hash % shards`, so zero shards is meaningless.
    #[error("shard count must be greater than zero")]
    InvalidShardCount,
}

/// Construction parameters for a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of shards, fixed for the lifetime of the store
    pub shards: usize,
    /// Replica count. Reserved: accepted and reported, but no replication happens.
    pub replicas: usize,
    /// Whether to take a per-key lock under the shard lock.
    ///
    /// With this off the store relies on the shard lock alone and keeps no
    /// per-key state, so the key lock registry can no longer grow without bound.
    pub key_locks: bool,
}

impl StoreConfig {
    pub fn new(shards: usize, replicas: usize) -> Self {
        Self {
            shards,
            replicas,
            key_locks: true,
        }
    }

    pub fn with_key_locks(mut self, enabled: bool) -> Self {
        self.key_locks = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SHARDS, DEFAULT_REPLICAS)
    }
}

/// The sharded key-value store.
///
/// Wrap it in an `Arc` to share it across threads or request handlers.
/// All operations are synchronous and thread-safe.
///
/// # Example
///
/// ```
/// use shardkv::storage::Store;
/// use std::time::Duration;
///
/// let store = Store::new(2, 1).unwrap();
///
/// store.set("key1", "value1", Duration::from_secs(10));
/// assert_eq!(store.get("key1"), Some("value1".to_string()));
/// assert_eq!(store.get("key3"), None);
/// ```
pub struct Store {
    /// Sharded storage, indexed by `router::shard_index`
    shards: Vec<Shard>,

    /// Per-key locks, `None` when running with shard locks only
    key_locks: Option<KeyLockRegistry>,

    /// Reserved replica count
    replicas: usize,

    get_count: AtomicU64,
    set_count: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    expired_count: AtomicU64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("shards", &self.shards.len())
            .field("replicas", &self.replicas)
            .field("key_locks", &self.key_locks.is_some())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Store {
    /// Creates a store with `shards` partitions and per-key locking enabled.
    pub fn new(shards: usize, replicas: usize) -> Result<Self, StoreError> {
        Self::with_config(StoreConfig::new(shards, replicas))
    }

    /// Creates a store from an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        if config.shards == 0 {
            return Err(StoreError::InvalidShardCount);
        }

        let shards = (0..config.shards).map(|_| Shard::default()).collect();
        let key_locks = config.key_locks.then(KeyLockRegistry::new);

        debug!(
            shards = config.shards,
            replicas = config.replicas,
            key_locks = config.key_locks,
            "Store created"
        );

        Ok(Self {
            shards,
            key_locks,
            replicas: config.replicas,
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        })
    }

    /// Determines which shard a key belongs to.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        router::shard_index(key, self.shards.len())
    }

    #[inline]
    fn get_shard(&self, key: &str) -> &Shard {
        &self.shards[self.shard_index(key)]
    }

    #[inline]
    fn key_lock(&self, key: &str) -> Option<KeyLock> {
        self.key_locks.as_ref().map(|registry| registry.lock_for(key))
    }

    /// Sets a key-value pair that expires `ttl` from now.
    ///
    /// Overwrites any existing entry. A zero TTL stores an entry that is
    /// already invisible to `get`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.insert(key.into(), value.into(), Some(ttl));
    }

    /// Sets a key-value pair that never expires.
    pub fn set_persistent(&self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), value.into(), None);
    }

    fn insert(&self, key: String, value: String, ttl: Option<Duration>) {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let shard = self.get_shard(&key);
        let mut entries = shard.entries.write();
        let key_lock = self.key_lock(&key);
        let _key_guard = key_lock.as_ref().map(|lock| lock.write());

        // Expiry is computed once both locks are held
        let entry = match ttl {
            Some(ttl) => Entry::with_ttl(value, ttl),
            None => Entry::new(value),
        };

        trace!(key = %key, shard = self.shard_index(&key), "Set");
        entries.insert(key, entry);
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    /// Expired entries are removed from their shard when observed here.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let shard = self.get_shard(key);

        // Fast path under shared locks
        {
            let entries = shard.entries.read();
            let key_lock = self.key_lock(key);
            let _key_guard = key_lock.as_ref().map(|lock| lock.read());

            match entries.get(key) {
                None => {
                    self.miss_count.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
                Some(entry) if !entry.is_expired() => {
                    self.hit_count.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        self.remove_expired(key)
    }

    /// Exclusive half of `get`: re-checks `key` under both write locks
    /// (shard, then key) and removes it if it is still expired.
    ///
    /// No lock is held between the shared and exclusive halves, so a `set`
    /// may have replaced the entry; its value is returned in that case.
    fn remove_expired(&self, key: &str) -> Option<String> {
        let shard = self.get_shard(key);
        let mut entries = shard.entries.write();
        let key_lock = self.key_lock(key);
        let _key_guard = key_lock.as_ref().map(|lock| lock.write());

        match entries.get(key) {
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            // Race: a set replaced the entry while no lock was held
            Some(entry) if !entry.is_expired() => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }

        entries.remove(key);
        self.expired_count.fetch_add(1, Ordering::Relaxed);
        self.miss_count.fetch_add(1, Ordering::Relaxed);
        trace!(key = %key, "Expired key removed");

        None
    }

    /// Number of shards, fixed at construction.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// The reserved replica count given at construction.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Returns the number of entries physically held across all shards.
    ///
    /// Expired entries are counted until a `get` observes and removes them.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.entries.read().len()).sum()
    }

    /// Returns true if no shard holds any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of per-key locks created so far (0 with key locks disabled).
    pub fn tracked_key_locks(&self) -> usize {
        self.key_locks.as_ref().map_or(0, KeyLockRegistry::len)
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            hits: self.hit_count.load(Ordering::Relaxed),
            misses: self.miss_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of entries currently held
    pub keys: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total SET operations
    pub set_ops: u64,
    /// GETs that returned a value
    pub hits: u64,
    /// GETs that found nothing, or only an expired entry
    pub misses: u64,
    /// Expired entries removed on access
    pub expired: u64,
}
