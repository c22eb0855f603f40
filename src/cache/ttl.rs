//! TTL and Expiry Module
//!
//! Time-to-live values as callers supply them and the absolute expiry they
//! resolve to once an entry is written.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CacheError, Result};

/// Keyword accepted wherever a TTL is parsed to mean "never expires".
pub const NEVER_KEYWORD: &str = "never";

// == Ttl ==
/// Relative lifetime of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Entry expires this long after it was written
    After(Duration),
    /// Entry never expires
    Never,
}

impl Ttl {
    /// Builds a finite TTL from a number of seconds.
    ///
    /// Rejects negative, NaN, infinite and out-of-range values.
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CacheError::InvalidRequest(format!(
                "TTL must be a non-negative number of seconds, got {}",
                secs
            )));
        }
        Duration::try_from_secs_f64(secs)
            .map(Ttl::After)
            .map_err(|_| CacheError::InvalidRequest(format!("TTL {} is out of range", secs)))
    }

    /// Resolves this TTL against the moment the entry is written.
    ///
    /// `Never` maps to the `Never` expiry, not to `now + duration`.
    pub fn expiry_from(self, now: Instant) -> Expiry {
        match self {
            Ttl::After(duration) => now
                .checked_add(duration)
                .map_or(Expiry::Never, Expiry::At),
            Ttl::Never => Expiry::Never,
        }
    }

    /// Returns the TTL in seconds, or None for `Never`.
    pub fn as_secs_f64(self) -> Option<f64> {
        match self {
            Ttl::After(duration) => Some(duration.as_secs_f64()),
            Ttl::Never => None,
        }
    }
}

impl FromStr for Ttl {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(NEVER_KEYWORD) || trimmed.eq_ignore_ascii_case("infinite")
        {
            return Ok(Ttl::Never);
        }
        let secs: f64 = trimmed
            .parse()
            .map_err(|_| CacheError::InvalidRequest(format!("Invalid TTL: '{}'", s)))?;
        Ttl::from_secs_f64(secs)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::After(duration) => write!(f, "{}s", duration.as_secs_f64()),
            Ttl::Never => f.write_str(NEVER_KEYWORD),
        }
    }
}

// Wire form: a number of seconds, or the string "never".
impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Ttl::After(duration) => serializer.serialize_f64(duration.as_secs_f64()),
            Ttl::Never => serializer.serialize_str(NEVER_KEYWORD),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TtlRepr {
    Seconds(f64),
    Keyword(String),
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parsed = match TtlRepr::deserialize(deserializer)? {
            TtlRepr::Seconds(secs) => Ttl::from_secs_f64(secs),
            TtlRepr::Keyword(keyword) => keyword.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

// == Expiry ==
/// Absolute expiry of an entry.
///
/// Variant order matters: every `At` sorts before `Never`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expiry {
    At(Instant),
    Never,
}

impl Expiry {
    /// True when the expiry lies strictly before `now`.
    pub fn is_before(&self, now: Instant) -> bool {
        match self {
            Expiry::At(at) => *at < now,
            Expiry::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_maps_to_never_expiry() {
        let now = Instant::now();
        assert_eq!(Ttl::Never.expiry_from(now), Expiry::Never);
    }

    #[test]
    fn test_finite_ttl_adds_to_now() {
        let now = Instant::now();
        let expiry = Ttl::After(Duration::from_secs(3)).expiry_from(now);
        assert_eq!(expiry, Expiry::At(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_expiry_ordering_never_is_latest() {
        let now = Instant::now();
        let later = now + Duration::from_secs(3600);
        assert!(Expiry::At(now) < Expiry::At(later));
        assert!(Expiry::At(later) < Expiry::Never);
    }

    #[test]
    fn test_is_before_is_strict() {
        let now = Instant::now();
        assert!(!Expiry::At(now).is_before(now));
        assert!(Expiry::At(now).is_before(now + Duration::from_millis(1)));
        assert!(!Expiry::Never.is_before(now + Duration::from_secs(1_000_000)));
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!("never".parse::<Ttl>().unwrap(), Ttl::Never);
        assert_eq!("INFINITE".parse::<Ttl>().unwrap(), Ttl::Never);
        assert_eq!(
            "1.5".parse::<Ttl>().unwrap(),
            Ttl::After(Duration::from_millis(1500))
        );
        assert!("-1".parse::<Ttl>().is_err());
        assert!("soon".parse::<Ttl>().is_err());
    }

    #[test]
    fn test_from_secs_rejects_non_finite() {
        assert!(Ttl::from_secs_f64(f64::NAN).is_err());
        assert!(Ttl::from_secs_f64(f64::INFINITY).is_err());
        assert!(Ttl::from_secs_f64(1e300).is_err());
    }

    #[test]
    fn test_ttl_serde() {
        let ttl: Ttl = serde_json::from_str("60").unwrap();
        assert_eq!(ttl, Ttl::After(Duration::from_secs(60)));

        let ttl: Ttl = serde_json::from_str(r#""never""#).unwrap();
        assert_eq!(ttl, Ttl::Never);

        assert!(serde_json::from_str::<Ttl>("-5").is_err());

        assert_eq!(serde_json::to_string(&Ttl::Never).unwrap(), r#""never""#);
        assert_eq!(
            serde_json::to_string(&Ttl::After(Duration::from_millis(2500))).unwrap(),
            "2.5"
        );
    }
}
