//! HTTP Interface Module
//!
//! A thin axum adapter over the storage engine. Each request is handled on
//! the tokio runtime and calls straight into the synchronous [`Store`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TCP Listener   │  (main.rs)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  axum Router    │  (this module)
//! │                 │
//! │  - TraceLayer   │
//! │  - POST /set    │
//! │  - GET  /get    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! [`Store`]: crate::storage::Store

pub mod handler;

pub use handler::{router, serve, ApiError, AppState, GetResponse, SetRequest};
