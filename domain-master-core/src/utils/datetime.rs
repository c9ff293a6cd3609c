//! Datetime serialization/deserialization helpers.
//!
//! Record timestamps are stored as Unix epoch milliseconds:
//! - Serialization: `DateTime<Utc>` -> integer milliseconds
//! - Deserialization: integer milliseconds (or seconds) or an RFC3339 string -> `DateTime<Utc>`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampOrString {
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
}

impl TimestampOrString {
    fn into_datetime<E: serde::de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            Self::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Self::I64(ts) => {
                parse_unix_timestamp(ts).ok_or_else(|| E::custom("Invalid Unix timestamp"))
            }
            // The `cast_signed` method explicitly performs a wrapping cast from u64 to i64.
            Self::U64(ts) => parse_unix_timestamp(ts.cast_signed())
                .ok_or_else(|| E::custom("Invalid Unix timestamp")),
            // `Date.now()` values written by older exports may carry a fraction.
            #[allow(clippy::cast_possible_truncation)]
            Self::F64(ts) => parse_unix_timestamp(ts.trunc() as i64)
                .ok_or_else(|| E::custom("Invalid Unix timestamp")),
        }
    }
}

/// Serializes `DateTime<Utc>` as epoch milliseconds.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(dt.timestamp_millis())
}

/// Deserializes `DateTime<Utc>` from epoch milliseconds or RFC3339.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    TimestampOrString::deserialize(deserializer)?.into_datetime()
}

/// `Option<DateTime<Utc>>` serializer/deserializer helpers.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, Serializer, TimestampOrString, Utc};

    /// Serializes `Option<DateTime<Utc>>` as epoch milliseconds or `null`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from epoch milliseconds, RFC3339, or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<TimestampOrString>::deserialize(deserializer)?
            .map(TimestampOrString::into_datetime)
            .transpose()
    }
}

/// Parses a Unix timestamp with second/millisecond auto-detection.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // Values larger than 10^11 are interpreted as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
