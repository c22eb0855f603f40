//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry and a
//! popularity counter.

use std::time::Instant;

use crate::cache::{Expiry, Ttl};

// == Popularity ==
/// Saturating access counter used to rank eviction candidates.
///
/// Never overflows on increment and never goes below zero on decay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Popularity(u32);

impl Popularity {
    pub const MAX: Popularity = Popularity(u32::MAX);

    pub fn new(count: u32) -> Self {
        Self(count)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Records one access.
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Applies one decay step.
    pub fn decay(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Absolute expiry
    pub expires_at: Expiry,
    /// Access counter
    pub popularity: Popularity,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry; the write counts as its first access.
    pub fn new(value: String, ttl: Ttl, now: Instant) -> Self {
        let mut popularity = Popularity::default();
        popularity.increment();

        Self {
            value,
            expires_at: ttl.expiry_from(now),
            popularity,
        }
    }

    // == Overwrite ==
    /// Replaces the value in place, recomputes expiry and counts an access.
    pub fn overwrite(&mut self, value: String, ttl: Ttl, now: Instant) {
        self.value = value;
        self.expires_at = ttl.expiry_from(now);
        self.popularity.increment();
    }

    // == Is Expired ==
    /// True when the entry's expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_before(now)
    }
}
