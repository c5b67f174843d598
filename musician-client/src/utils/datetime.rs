//! Date/time serde helpers for backend payloads.
//!
//! The backend renders timestamps as RFC 3339 strings (`last_login`,
//! `date_joined`) and calendar dates as `YYYY-MM-DD` (`created_on`, `due_on`).
//! Both may be `null` or absent; an empty string is treated as absent too.
//!
//! Use with `#[serde(default, with = "crate::utils::datetime")]` for
//! `Option<DateTime<Utc>>` and `crate::utils::datetime::date` for
//! `Option<NaiveDate>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize `Option<DateTime<Utc>>` as an optional RFC 3339 string.
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an RFC 3339 string or a Unix timestamp in seconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) if s.trim().is_empty() => Ok(None),
        Some(OptionalTimestamp::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp '{s}': {e}"))),
        Some(OptionalTimestamp::I64(ts)) => DateTime::from_timestamp(ts, 0)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// `YYYY-MM-DD` calendar dates.
pub mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts a plain date or a full timestamp (the date part is kept).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, FORMAT)
            .map(Some)
            .map_err(|e| Error::custom(format!("Invalid date '{raw}': {e}")))
    }
}
