//! # ShardKV - A Sharded In-Memory Key-Value Store
//!
//! ShardKV is an in-memory key-value store served over HTTP, with per-key
//! time-to-live and concurrent access from many callers.
//!
//! ## Features
//!
//! - **Sharded Storage**: keys are spread over independent `RwLock`ed shards with FNV-1a
//! - **Per-Key Locks**: an optional second lock layer, always taken after the shard lock
//! - **TTL Support**: every write carries an expiry, enforced lazily on read
//! - **HTTP API**: `POST /set` and `GET /get`, built on axum and Tokio
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              ShardKV                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ axum Router │───>│  Handlers   │                  │
//! │  │ (Listener)  │    │ TraceLayer  │    │ /set  /get  │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                     ┌──────────────────────────────────────────────┐    │
//! │                     │                    Store                     │    │
//! │                     │  ┌────────┐ ┌────────┐ ┌────────┐            │    │
//! │                     │  │Shard 0 │ │Shard 1 │ │...N    │            │    │
//! │                     │  │RwLock  │ │RwLock  │ │shards  │            │    │
//! │                     │  └────────┘ └────────┘ └────────┘            │    │
//! │                     │  KeyLockRegistry (key -> RwLock)             │    │
//! │                     └──────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use shardkv::http::{serve, AppState};
//! use shardkv::storage::Store;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(Store::new(3, 3)?);
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     serve(listener, AppState::new(store, shardkv::DEFAULT_TTL), std::future::pending()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: sharded store, key routing, per-key locks
//! - [`http`]: the axum adapter exposing the store
//! - [`config`]: command-line configuration for the server binary
//!
//! ## Design Highlights
//!
//! ### Lock Ordering
//!
//! Both read and write paths take the shard lock first and the key lock
//! second, releasing in reverse. The expiry path in `get` re-acquires both
//! exclusively in the same order.
//!
//! ### Lazy Expiry
//!
//! There is no background sweeper. An expired entry is hidden from `get` and
//! removed from its shard the first time it is looked up.
//!
//! ### Replicas
//!
//! A replica count is accepted and reported, but nothing is replicated.

pub mod config;
pub mod http;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::Config;
pub use http::{router, serve, ApiError, AppState};
pub use storage::{Store, StoreConfig, StoreError, StoreStats};

use std::time::Duration;

/// The default port ShardKV listens on
pub const DEFAULT_PORT: u16 = 8080;

/// The default host ShardKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default number of shards
pub const DEFAULT_SHARDS: usize = 3;

/// Default replica count (reserved)
pub const DEFAULT_REPLICAS: usize = 3;

/// TTL applied to keys written over HTTP: 1000 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(1000 * 60);

/// Version of ShardKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
