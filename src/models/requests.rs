//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming request bodies and their validation.

use serde::Deserialize;

use crate::cache::{SettingsUpdate, Ttl};

// == Limits ==
/// Maximum key length in characters
pub const MAX_KEY_LENGTH: usize = 200;

/// Maximum value length in characters
pub const MAX_VALUE_LENGTH: usize = 1024 * 1024 / 2;

/// Maximum key filter length in characters
pub const MAX_FILTER_LENGTH: usize = 200;

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store; `null` or absent deletes the key
/// - `ttl`: Optional TTL in seconds, or `"never"` (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetValueRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Option<String>,
    /// Optional TTL
    #[serde(default)]
    pub ttl: Option<Ttl>,
}

impl SetValueRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(error) = validate_key(&self.key) {
            return Some(error);
        }
        if let Some(value) = &self.value {
            if value.chars().count() > MAX_VALUE_LENGTH {
                return Some(format!(
                    "Value exceeds maximum length of {} characters",
                    MAX_VALUE_LENGTH
                ));
            }
        }
        None
    }
}

/// Request to read one value
#[derive(Debug, Clone, Deserialize)]
pub struct GetValueRequest {
    pub key: String,
}

impl GetValueRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request to delete one key
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteKeyRequest {
    pub key: String,
}

impl DeleteKeyRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request to list keys, optionally keeping only those containing `filter`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetKeysRequest {
    #[serde(default)]
    pub filter: Option<String>,
}

impl GetKeysRequest {
    pub fn validate(&self) -> Option<String> {
        match &self.filter {
            Some(filter) if filter.chars().count() > MAX_FILTER_LENGTH => Some(format!(
                "Filter exceeds maximum length of {} characters",
                MAX_FILTER_LENGTH
            )),
            _ => None,
        }
    }
}

/// Request body for PUT /options
///
/// Only the provided fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOptionsRequest {
    #[serde(default)]
    pub default_ttl: Option<Ttl>,
    #[serde(default)]
    pub max_key_count: Option<usize>,
}

impl SetOptionsRequest {
    pub fn validate(&self) -> Option<String> {
        if self.max_key_count == Some(0) {
            return Some("maxKeyCount must be at least 1".to_string());
        }
        None
    }
}

impl From<&SetOptionsRequest> for SettingsUpdate {
    fn from(request: &SetOptionsRequest) -> Self {
        SettingsUpdate {
            default_ttl: request.default_ttl,
            max_key_count: request.max_key_count,
        }
    }
}

/// One step of a packet: groups of requests executed in a fixed order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketRequestItem {
    #[serde(default)]
    pub get_value: Vec<GetValueRequest>,
    #[serde(default)]
    pub set_value: Vec<SetValueRequest>,
    #[serde(default)]
    pub get_keys: Vec<GetKeysRequest>,
    #[serde(default)]
    pub delete_key: Vec<DeleteKeyRequest>,
    #[serde(default)]
    pub set_options: Vec<SetOptionsRequest>,
}

impl PacketRequestItem {
    pub fn is_empty(&self) -> bool {
        self.get_value.is_empty()
            && self.set_value.is_empty()
            && self.get_keys.is_empty()
            && self.delete_key.is_empty()
            && self.set_options.is_empty()
    }

    pub fn validate(&self) -> Option<String> {
        if self.is_empty() {
            return Some("Packet item contains no requests".to_string());
        }
        self.get_value
            .iter()
            .find_map(GetValueRequest::validate)
            .or_else(|| self.set_value.iter().find_map(SetValueRequest::validate))
            .or_else(|| self.get_keys.iter().find_map(GetKeysRequest::validate))
            .or_else(|| self.delete_key.iter().find_map(DeleteKeyRequest::validate))
            .or_else(|| self.set_options.iter().find_map(SetOptionsRequest::validate))
    }
}

/// Request body for POST /packet
#[derive(Debug, Clone, Deserialize)]
pub struct PacketRequest {
    pub actions: Vec<PacketRequestItem>,
}

impl PacketRequest {
    pub fn validate(&self) -> Option<String> {
        if self.actions.is_empty() {
            return Some("Packet must contain at least one action".to_string());
        }
        self.actions
            .iter()
            .enumerate()
            .find_map(|(i, item)| item.validate().map(|e| format!("actions[{}]: {}", i, e)))
    }
}
