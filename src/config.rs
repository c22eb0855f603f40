//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheOptions, Ttl, DEFAULT_QUEUE_CAPACITY};
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. A variable that is set but does not parse is an error; range
/// checks happen in [`Config::cache_options`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys the cache can hold
    pub max_key_count: usize,
    /// TTL for entries set without an explicit TTL
    pub default_ttl: Ttl,
    /// Interval between expiry sweeps, in seconds
    pub clear_expired_values_period: f64,
    /// Interval between popularity decay passes, in seconds
    pub decrease_popularity_period: f64,
    /// Bound on operations queued for the cache worker
    pub command_queue_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_KEY_COUNT` - Maximum cache keys (default: 100000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, or `never` (default: 300)
    /// - `CLEAR_EXPIRED_VALUES_PERIOD` - Sweep frequency in seconds (default: 1)
    /// - `DECREASE_POPULARITY_PERIOD` - Decay frequency in seconds (default: 10)
    /// - `COMMAND_QUEUE_CAPACITY` - Worker queue bound (default: 1024)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_key_count: env_or("MAX_KEY_COUNT", defaults.max_key_count)?,
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl)?,
            clear_expired_values_period: env_or(
                "CLEAR_EXPIRED_VALUES_PERIOD",
                defaults.clear_expired_values_period,
            )?,
            decrease_popularity_period: env_or(
                "DECREASE_POPULARITY_PERIOD",
                defaults.decrease_popularity_period,
            )?,
            command_queue_capacity: env_or(
                "COMMAND_QUEUE_CAPACITY",
                defaults.command_queue_capacity,
            )?,
            server_port: env_or("SERVER_PORT", defaults.server_port)?,
        })
    }

    /// Validates the cache-related values and builds [`CacheOptions`].
    pub fn cache_options(&self) -> Result<CacheOptions> {
        CacheOptions::new(
            period("CLEAR_EXPIRED_VALUES_PERIOD", self.clear_expired_values_period)?,
            period("DECREASE_POPULARITY_PERIOD", self.decrease_popularity_period)?,
            self.default_ttl,
            self.max_key_count,
        )?
        .with_queue_capacity(self.command_queue_capacity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_key_count: 100_000,
            default_ttl: Ttl::After(Duration::from_secs(300)),
            clear_expired_values_period: 1.0,
            decrease_popularity_period: 10.0,
            command_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            server_port: 3000,
        }
    }
}

/// Reads `name`, using `default` only when the variable is unset.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfiguration(format!("{} has an invalid value '{}'", name, raw))
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(CacheError::InvalidConfiguration(format!(
            "{} is not valid unicode",
            name
        ))),
    }
}

fn period(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        CacheError::InvalidConfiguration(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, secs
        ))
    })
}
