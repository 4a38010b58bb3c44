//! HTTP Handlers
//!
//! Maps the two HTTP endpoints onto the storage engine.
//!
//! ```text
//! POST /set   {"key": "...", "value": "..."}  ──> Store::set(key, value, ttl)
//! GET  /get?key=...                           ──> Store::get(key)
//! ```
//!
//! The request body for `/set` is decoded from raw bytes rather than through
//! axum's `Json` extractor, so clients that omit `Content-Type` are accepted
//! and every decode failure maps to the same `400 Invalid request body`.
//! Field names match case-insensitively, missing or null fields decode as
//! empty strings, and a `null` body is an empty request.
//!
//! The query string for `/get` is read as raw pairs and the first `key` wins,
//! so repeated or unrelated parameters never produce a framework error.

use crate::storage::Store;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<Store>,
    /// TTL applied to every `/set`
    ttl: Duration,
}

impl AppState {
    pub fn new(store: Arc<Store>, ttl: Duration) -> Self {
        Self { store, ttl }
    }
}

/// Body of `POST /set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

impl<'de> Deserialize<'de> for SetRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SetRequestVisitor)
    }
}

struct SetRequestVisitor;

impl<'de> Visitor<'de> for SetRequestVisitor {
    type Value = SetRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with string fields `key` and `value`")
    }

    fn visit_map<A>(self, mut map: A) -> Result<SetRequest, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut request = SetRequest::default();

        // Fields are applied in document order, so a repeated field keeps its last value
        while let Some(name) = map.next_key::<String>()? {
            let slot = if name.eq_ignore_ascii_case("key") {
                &mut request.key
            } else if name.eq_ignore_ascii_case("value") {
                &mut request.value
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(text) = map.next_value::<Option<String>>()? {
                *slot = text;
            }
        }

        Ok(request)
    }
}

/// Returns the first `key` parameter of a decoded query string.
fn first_key(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find_map(|(name, value)| (name == "key").then_some(value))
}

/// Body returned by a successful `GET /get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

/// Client-facing failures, rendered as a status code and plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Key parameter is missing")]
    MissingKey,

    #[error("Key not found")]
    KeyNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::MissingKey => StatusCode::BAD_REQUEST,
            ApiError::KeyNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

async fn set_key(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let request = serde_json::from_slice::<Option<SetRequest>>(&body)
        .map_err(|e| {
            warn!(error = %e, "Rejected set request");
            ApiError::InvalidBody(e)
        })?
        .unwrap_or_default();

    state.store.set(request.key, request.value, state.ttl);
    Ok(StatusCode::OK)
}

async fn get_key(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<GetResponse>, ApiError> {
    let key = query
        .ok()
        .and_then(|Query(pairs)| first_key(pairs))
        .filter(|key| !key.is_empty())
        .ok_or(ApiError::MissingKey)?;

    let value = state.store.get(&key).ok_or_else(|| {
        debug!(key = %key, "Key not found");
        ApiError::KeyNotFound
    })?;

    Ok(Json(GetResponse { key, value }))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/set", post(set_key))
        .route("/get", get(get_key))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the application on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
