//! popcache - A network-exposed key/value cache
//!
//! Bounded capacity, per-entry TTL and popularity-weighted eviction, with
//! every operation serialized through a single worker.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheHandle;
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{CacheError, Result};
