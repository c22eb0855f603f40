//! Cache Store Module
//!
//! The table of live entries plus the eviction, expiry and decay algorithms.
//! `CacheStore` is a plain synchronous state machine; serialization of
//! concurrent callers is the worker's job (see `cache::worker`).

use std::collections::HashMap;
use std::time::Instant;

use tracing::{error, warn};

use crate::cache::{
    CacheEntry, CacheSettings, CacheStats, Popularity, SettingsUpdate, Ttl,
};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with popularity-weighted eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Runtime-adjustable settings (default TTL, capacity)
    settings: CacheSettings,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with the given settings.
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            settings,
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// A `None` value deletes the key. An existing key is updated in place
    /// (value, expiry, popularity). A new key first evicts while the table is
    /// at capacity, then is inserted.
    ///
    /// # Arguments
    /// * `key` - The key to store, must not be empty
    /// * `value` - The value to store, or None to delete
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    /// * `now` - Time of the write
    pub fn set(
        &mut self,
        key: String,
        value: Option<String>,
        ttl: Option<Ttl>,
        now: Instant,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Key cannot be empty".to_string(),
            ));
        }

        let Some(value) = value else {
            self.delete(&key);
            return Ok(());
        };

        let ttl = ttl.unwrap_or(self.settings.default_ttl);

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.overwrite(value, ttl, now);
            return Ok(());
        }

        self.make_room()?;
        self.entries.insert(key, CacheEntry::new(value, ttl, now));
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Entries whose expiry lies before `now` are treated as absent but are
    /// left for the sweep to remove. A hit counts as an access.
    pub fn get(&mut self, key: &str, now: Instant) -> Option<String> {
        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.popularity.increment();
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Keys ==
    /// Returns all keys currently in the table, including lazily expired
    /// entries not yet swept. Order is unspecified.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Sweep Expired ==
    /// Removes every entry whose expiry lies strictly before `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Decay Popularity ==
    /// Lowers every entry's popularity by one step, floored at zero.
    ///
    /// Returns the number of entries visited.
    pub fn decay_popularity(&mut self) -> usize {
        for entry in self.entries.values_mut() {
            entry.popularity.decay();
        }
        self.stats.record_decay_pass();
        self.entries.len()
    }

    // == Settings ==
    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Applies a partial settings update. Takes effect on the next Set.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<()> {
        self.settings.apply(update)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Peek ==
    /// Looks at an entry without counting an access.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Eviction ==
    /// Evicts until a new key fits under `max_key_count`.
    ///
    /// Loops so that a capacity lowered at runtime is honoured on the next
    /// insert.
    fn make_room(&mut self) -> Result<()> {
        while self.entries.len() >= self.settings.max_key_count {
            let Some(key) = self.eviction_candidate() else {
                error!(
                    "Eviction found no candidate in a table of {} entries",
                    self.entries.len()
                );
                return Err(CacheError::InvariantViolation(
                    "no eviction candidate in a non-empty table".to_string(),
                ));
            };

            if let Some(evicted) = self.entries.remove(&key) {
                warn!(
                    "Evicted key '{}' (popularity {})",
                    key,
                    evicted.popularity.get()
                );
            }
            self.stats.record_eviction();
        }
        Ok(())
    }

    /// Highest popularity wins; ties go to the earliest expiry.
    fn eviction_candidate(&self) -> Option<String> {
        self.entries
            .iter()
            .max_by(|(_, a), (_, b)| {
                a.popularity
                    .cmp(&b.popularity)
                    .then_with(|| b.expires_at.cmp(&a.expires_at))
            })
            .map(|(key, _)| key.clone())
    }

    #[cfg(test)]
    pub(crate) fn set_popularity(&mut self, key: &str, popularity: Popularity) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.popularity = popularity;
        }
    }
}
