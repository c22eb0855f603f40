//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing response bodies.

use serde::Serialize;

use crate::cache::{CacheSettings, CacheStats, Ttl};

/// Response body for a value lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetValueResponse {
    /// The stored value, null when absent or expired
    pub value: Option<String>,
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for a delete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteKeyResponse {
    /// Whether the key was present
    pub deleted: bool,
}

/// Response body for a key listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetKeysResponse {
    pub keys: Vec<String>,
}

/// Response body for GET/PUT /options
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub default_ttl: Ttl,
    pub max_key_count: usize,
}

impl From<CacheSettings> for OptionsResponse {
    fn from(settings: CacheSettings) -> Self {
        Self {
            default_ttl: settings.default_ttl,
            max_key_count: settings.max_key_count,
        }
    }
}

/// Responses produced by one packet item
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketResponseItem {
    pub get_value: Vec<GetValueResponse>,
    pub get_keys: Vec<GetKeysResponse>,
    pub delete_key: Vec<DeleteKeyResponse>,
}

/// Response body for POST /packet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketResponse {
    pub results: Vec<PacketResponseItem>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of entries removed by the expiry sweep
    pub expired: u64,
    /// Number of popularity decay passes
    pub decay_passes: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expired: stats.expired,
            decay_passes: stats.decay_passes,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
