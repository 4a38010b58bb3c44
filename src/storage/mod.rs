//! Storage Engine Module
//!
//! This module provides the core storage functionality for ShardKV:
//! a thread-safe, sharded key-value store with lazy TTL expiry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │                                                             │
//! │   key ──> fnv1a_32(key) % N                                 │
//! │                │                                            │
//! │                ▼                                            │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐                        │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard N │   (RwLock<HashMap>)    │
//! │  └─────────┘ └─────────┘ └─────────┘                        │
//! │                                                             │
//! │  ┌───────────────────────────────────┐                      │
//! │  │ KeyLockRegistry (key -> RwLock)   │   taken after shard  │
//! │  └───────────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Sharded Storage**: independent shards reduce lock contention
//! - **RwLock**: multiple concurrent readers, exclusive writers
//! - **Per-Key Locks**: optional fine-grained locks under the shard lock
//! - **Lazy Expiry**: expired keys are hidden and removed on access
//!
//! ## Example
//!
//! ```
//! use shardkv::storage::{Store, StoreConfig};
//! use std::time::Duration;
//!
//! let store = Store::with_config(StoreConfig::new(3, 3)).unwrap();
//!
//! store.set("session", "token123", Duration::from_secs(3600));
//! assert_eq!(store.get("session"), Some("token123".to_string()));
//! ```

pub mod engine;
pub mod locks;
pub mod router;

// Re-export commonly used types
pub use engine::{Entry, Store, StoreConfig, StoreError, StoreStats};
pub use locks::{KeyLock, KeyLockRegistry};
pub use router::{fnv1a_32, shard_index};
