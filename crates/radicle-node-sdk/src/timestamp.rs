//! Node timestamps.
//!
//! REST responses carry Unix seconds while webhook payloads from newer nodes
//! carry RFC3339 strings. [`Timestamp`] accepts either and always serializes
//! back to Unix seconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// UTC timestamp with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from Unix seconds.
    ///
    /// Returns `None` when the value is outside the range chrono can represent.
    pub fn from_unix(seconds: i64) -> Option<Self> {
        DateTime::from_timestamp(seconds, 0).map(Self)
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Seconds since the Unix epoch.
    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self(DateTime::<Utc>::default())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.unix())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Text(String),
    Null,
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Seconds(seconds) => Self::from_unix(seconds)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", seconds))),
            RawTimestamp::Text(text) => text
                .parse::<i64>()
                .ok()
                .and_then(Self::from_unix)
                .or_else(|| Self::from_rfc3339(&text))
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: '{}'", text))),
            RawTimestamp::Null => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
#[path = "timestamp_tests.rs"]
mod tests;
