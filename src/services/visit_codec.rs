//! Cache record codec.
//!
//! A stored entry is the visitor record flattened into one JSON object, plus
//! `valid_until` rendered as `YYYY-MM-DD HH:MM:SS.mmm+0000`. The timestamp is a
//! fixed-format string (not an epoch number) so the value stays readable with
//! a plain `GET` from redis-cli.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::services::visit::VisitorRecord;

/// chrono format of the embedded expiry timestamp.
pub const VALID_UNTIL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f%z";

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cache value is not a valid entry: {0}")]
    Json(#[source] serde_json::Error),
    #[error("valid_until is missing from cache value")]
    MissingValidUntil,
    #[error("valid_until has an invalid format: {raw:?}")]
    InvalidValidUntil { raw: String },
}

/// Absolute expiry instant of a cache entry, at millisecond precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidUntil(DateTime<Utc>);

impl ValidUntil {
    /// Sub-millisecond digits are dropped so the value survives a trip
    /// through its text form unchanged.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(3))
    }

    pub fn after(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::at(now + ttl)
    }

    #[cfg(test)]
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// An entry is still valid at exactly its `valid_until` instant.
    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.0
    }
}

impl fmt::Display for ValidUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(VALID_UNTIL_FORMAT))
    }
}

impl FromStr for ValidUntil {
    type Err = CodecError;

    fn from_str(raw: &str) -> CodecResult<Self> {
        let invalid = || CodecError::InvalidValidUntil {
            raw: raw.to_string(),
        };

        let parsed = DateTime::parse_from_str(raw, VALID_UNTIL_FORMAT).map_err(|_| invalid())?;
        let candidate = Self(parsed.with_timezone(&Utc));

        // chrono's parser is lenient about fraction width and offset spelling;
        // only the canonical rendering is accepted.
        if candidate.to_string() != raw {
            return Err(invalid());
        }

        Ok(candidate)
    }
}

impl Serialize for ValidUntil {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decoded form of a stored value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub record: VisitorRecord,
    pub valid_until: ValidUntil,
}

#[derive(Serialize)]
struct StoredEntry<'a> {
    #[serde(flatten)]
    record: &'a VisitorRecord,
    valid_until: ValidUntil,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(flatten)]
    record: VisitorRecord,
    #[serde(default)]
    valid_until: Option<Value>,
}

pub fn encode(record: &VisitorRecord, valid_until: ValidUntil) -> CodecResult<String> {
    serde_json::to_string(&StoredEntry {
        record,
        valid_until,
    })
    .map_err(CodecError::Json)
}

pub fn decode(raw: &str) -> CodecResult<CacheEntry> {
    let entry: RawEntry = serde_json::from_str(raw).map_err(CodecError::Json)?;
    let valid_until = match entry.valid_until {
        None | Some(Value::Null) => return Err(CodecError::MissingValidUntil),
        Some(Value::String(raw)) => raw.parse::<ValidUntil>()?,
        // Any other JSON type (an epoch number, an object) is a bad timestamp,
        // not a bad entry.
        Some(other) => {
            return Err(CodecError::InvalidValidUntil {
                raw: other.to_string(),
            });
        }
    };

    Ok(CacheEntry {
        record: entry.record,
        valid_until,
    })
}
