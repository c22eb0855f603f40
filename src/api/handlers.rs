//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers validate
//! the request, then hand it to the [`Dispatcher`].

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheHandle;
use crate::dispatcher::Dispatcher;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteKeyRequest, DeleteKeyResponse, GetKeysRequest, GetKeysResponse, GetValueRequest,
    GetValueResponse, HealthResponse, OptionsResponse, PacketRequest, PacketResponse,
    SetOptionsRequest, SetResponse, SetValueRequest, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The dispatcher does not own the cache; whoever started the cache disposes
/// it on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Creates a new AppState around a running cache.
    pub fn new(cache: CacheHandle) -> Self {
        Self {
            dispatcher: Dispatcher::new(cache),
        }
    }
}

fn reject_invalid(error: Option<String>) -> Result<()> {
    match error {
        Some(message) => Err(CacheError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with optional TTL; a null value deletes the key.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SetResponse>> {
    reject_invalid(req.validate())?;

    state.dispatcher.set_value(&req).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Responds 404 when the key is absent or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetValueResponse>> {
    let req = GetValueRequest { key };
    reject_invalid(req.validate())?;

    let response = state.dispatcher.get_value(&req).await?;
    if response.value.is_none() {
        return Err(CacheError::NotFound(req.key));
    }

    Ok(Json(response))
}

/// Handler for DELETE /del/:key
///
/// Absent keys are not an error; the body reports whether anything was removed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteKeyResponse>> {
    let req = DeleteKeyRequest { key };
    reject_invalid(req.validate())?;

    Ok(Json(state.dispatcher.delete_key(&req).await?))
}

/// Handler for GET /keys?filter=
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(req): Query<GetKeysRequest>,
) -> Result<Json<GetKeysResponse>> {
    reject_invalid(req.validate())?;

    Ok(Json(state.dispatcher.get_keys(&req).await?))
}

/// Handler for GET /options
pub async fn get_options_handler(State(state): State<AppState>) -> Result<Json<OptionsResponse>> {
    Ok(Json(state.dispatcher.get_options().await?))
}

/// Handler for PUT /options
///
/// Applies a partial update and returns the resulting options.
pub async fn set_options_handler(
    State(state): State<AppState>,
    Json(req): Json<SetOptionsRequest>,
) -> Result<Json<OptionsResponse>> {
    reject_invalid(req.validate())?;

    state.dispatcher.set_options(&req).await?;

    Ok(Json(state.dispatcher.get_options().await?))
}

/// Handler for POST /packet
pub async fn packet_handler(
    State(state): State<AppState>,
    Json(req): Json<PacketRequest>,
) -> Result<Json<PacketResponse>> {
    reject_invalid(req.validate())?;

    Ok(Json(state.dispatcher.execute_packet(&req).await?))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.dispatcher.cache().stats().await?;
    Ok(Json(stats.into()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
