//! Timestamp handling for the backend's wire format.
//!
//! The backend stores and transmits instants as zone-less local date-times
//! which are UTC by convention. Every comparison in this crate happens on
//! `DateTime<Utc>`; India Standard Time only appears when formatting for
//! display or when reading wall-clock input from an admin.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Offset of India Standard Time from UTC, in seconds. IST has no DST.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Format used when sending timestamps to the backend. Fractional seconds
/// are written only when present.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Zone-less formats accepted on input, most specific first.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// The fixed IST offset.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within a day")
}

/// Parse a timestamp received from the backend (or typed by a user).
///
/// A timestamp without a zone suffix is UTC. RFC 3339 timestamps carrying an
/// explicit offset are also accepted and converted to UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid(field, "timestamp is empty"));
    }
    if let Some(naive) = parse_naive(raw) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::invalid(field, format!("`{raw}` is not a timestamp ({e})")))
}

/// Parse IST wall-clock input, as an admin would type it, into a UTC instant.
pub fn parse_ist_local(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    let naive = parse_naive(raw).ok_or_else(|| {
        Error::invalid(
            field,
            format!("`{raw}` is not a local date-time (expected YYYY-MM-DDTHH:MM)"),
        )
    })?;
    ist()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::invalid(field, format!("`{raw}` does not exist in IST")))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Convert an instant to IST for display.
pub fn to_ist(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&ist())
}

/// Human-readable IST rendering, e.g. `01 Jun 2024, 03:30 PM IST`.
pub fn format_ist(instant: DateTime<Utc>) -> String {
    to_ist(instant).format("%d %b %Y, %I:%M %p IST").to_string()
}

/// Serde adapter for the backend's zone-less UTC timestamps.
pub mod naive_utc {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_timestamp, WIRE_FORMAT};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&instant.format(WIRE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp("timestamp", &raw).map_err(de::Error::custom)
    }

    /// The same, for optional fields. `null` and absent both map to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        use super::super::{parse_timestamp, WIRE_FORMAT};

        pub fn serialize<S>(
            instant: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match instant {
                Some(instant) => serializer.collect_str(&instant.format(WIRE_FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse_timestamp("timestamp", &raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
