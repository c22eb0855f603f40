//! Cache Options Module
//!
//! Validated construction parameters for a cache instance and the subset that
//! can be changed at runtime.

use std::time::Duration;

use serde::Serialize;

use crate::cache::Ttl;
use crate::error::{CacheError, Result};

// == Public Constants ==
/// Shortest allowed period for either maintenance timer.
pub const MIN_MAINTENANCE_PERIOD: Duration = Duration::from_millis(500);

/// Default bound on queued commands waiting for the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

// == Cache Options ==
/// Operating parameters of a cache instance.
///
/// Only obtainable through [`CacheOptions::new`], so a value of this type is
/// always valid.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    clear_expired_values_period: Duration,
    decrease_popularity_period: Duration,
    settings: CacheSettings,
    queue_capacity: usize,
}

impl CacheOptions {
    // == Constructor ==
    /// Validates and builds a set of options.
    ///
    /// # Arguments
    /// * `clear_expired_values_period` - Interval between expiry sweeps
    /// * `decrease_popularity_period` - Interval between popularity decay passes
    /// * `default_ttl` - TTL applied when a Set carries none
    /// * `max_key_count` - Capacity of the table
    pub fn new(
        clear_expired_values_period: Duration,
        decrease_popularity_period: Duration,
        default_ttl: Ttl,
        max_key_count: usize,
    ) -> Result<Self> {
        check_period("clear_expired_values_period", clear_expired_values_period)?;
        check_period("decrease_popularity_period", decrease_popularity_period)?;
        check_max_key_count(max_key_count)?;

        Ok(Self {
            clear_expired_values_period,
            decrease_popularity_period,
            settings: CacheSettings {
                default_ttl,
                max_key_count,
            },
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    /// Overrides the command queue bound.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        self.queue_capacity = capacity;
        Ok(self)
    }

    pub fn clear_expired_values_period(&self) -> Duration {
        self.clear_expired_values_period
    }

    pub fn decrease_popularity_period(&self) -> Duration {
        self.decrease_popularity_period
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

// == Cache Settings ==
/// The runtime-adjustable part of the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    pub default_ttl: Ttl,
    pub max_key_count: usize,
}

impl CacheSettings {
    /// Applies a partial update; nothing changes if any field is invalid.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<()> {
        if let Some(max_key_count) = update.max_key_count {
            check_max_key_count(max_key_count)?;
        }

        if let Some(default_ttl) = update.default_ttl {
            self.default_ttl = default_ttl;
        }
        if let Some(max_key_count) = update.max_key_count {
            self.max_key_count = max_key_count;
        }
        Ok(())
    }
}

// == Settings Update ==
/// Partial update of [`CacheSettings`]; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub default_ttl: Option<Ttl>,
    pub max_key_count: Option<usize>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.default_ttl.is_none() && self.max_key_count.is_none()
    }
}

fn check_period(name: &str, period: Duration) -> Result<()> {
    if period < MIN_MAINTENANCE_PERIOD {
        return Err(CacheError::InvalidConfiguration(format!(
            "{} must be at least {:?}, got {:?}",
            name, MIN_MAINTENANCE_PERIOD, period
        )));
    }
    Ok(())
}

fn check_max_key_count(max_key_count: usize) -> Result<()> {
    if max_key_count < 1 {
        return Err(CacheError::InvalidConfiguration(
            "max_key_count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
