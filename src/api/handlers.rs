//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStore, EstimateSize};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ExistsResponse, FlushResponse, GetResponse, HealthResponse, KeysResponse,
    MaxMemoryRequest, MaxMemoryResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The store does its own locking, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store holding arbitrary JSON values
    pub cache: Arc<CacheStore<Value>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore<Value>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Initializes the cache store with the configured memory budget.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheStore::with_max_memory(config.max_memory.bytes))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value with optional TTL. Responds 507 when the value does not
/// fit in the remaining memory budget.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let size = req.value.estimated_size();
    let ttl = req.ttl.unwrap_or(0);
    if !state.cache.set_with_ttl_secs(req.key.clone(), req.value, ttl) {
        return Err(CacheError::MemoryLimitExceeded(format!(
            "value for '{}' ({} bytes) does not fit in the budget",
            req.key, size
        )));
    }

    Ok(Json(SetResponse::new(req.key, size)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key. Expired keys are reported as missing.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let (value, ttl) = state
        .cache
        .get_with_ttl(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    let ttl_remaining_ms = ttl.map(|remaining| remaining.as_millis() as u64);
    Ok(Json(GetResponse::new(key, value, ttl_remaining_ms)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Deleting a missing key also succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.del(&key);
    Json(DeleteResponse::new(key))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.cache.exists(&key);
    Json(ExistsResponse { key, exists })
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    state.cache.flush();
    Json(FlushResponse::new())
}

/// Handler for GET /keys
///
/// Returns the number of live entries; expired ones are purged first.
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    Json(KeysResponse {
        count: state.cache.keys(),
    })
}

/// Handler for PUT /max-memory
///
/// Applies a new memory budget. Unparseable sizes apply the 100MB default, and
/// the response reports the budget actually applied.
pub async fn max_memory_handler(
    State(state): State<AppState>,
    Json(req): Json<MaxMemoryRequest>,
) -> Json<MaxMemoryResponse> {
    let applied = state.cache.set_max_memory_str(&req.size);
    Json(MaxMemoryResponse::from(applied))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
