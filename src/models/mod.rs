//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    DeleteKeyRequest, GetKeysRequest, GetValueRequest, PacketRequest, PacketRequestItem,
    SetOptionsRequest, SetValueRequest,
};
pub use responses::{
    DeleteKeyResponse, ErrorResponse, GetKeysResponse, GetValueResponse, HealthResponse,
    OptionsResponse, PacketResponse, PacketResponseItem, SetResponse, StatsResponse,
};
