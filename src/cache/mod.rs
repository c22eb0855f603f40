//! Cache Module
//!
//! Provides the in-memory cache engine: a bounded table with TTL expiry,
//! popularity-weighted eviction and periodic popularity decay, driven by a
//! single worker that serializes every operation.

mod entry;
mod handle;
mod options;
mod stats;
mod store;
mod ttl;
mod worker;


// Re-export public types
pub use entry::{CacheEntry, Popularity};
pub use handle::CacheHandle;
pub use options::{
    CacheOptions, CacheSettings, SettingsUpdate, DEFAULT_QUEUE_CAPACITY, MIN_MAINTENANCE_PERIOD,
};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl::{Expiry, Ttl, NEVER_KEYWORD};

pub(crate) use worker::Command;
