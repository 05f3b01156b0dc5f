//! # Temporal Types
//!
//! [`Timestamp`] is a UTC instant truncated to seconds. All validity
//! windows (proof date ranges, credential `not_before` / `not_after`) are
//! expressed in it.
//!
//! [`PassportDate`] is the six-digit `YYMMDD` calendar date found in the
//! machine-readable zone and emitted by the disclosure circuit as its
//! `current_date` signal. Years are read as `20YY`: the circuit's current
//! date and document expiry dates always fall in this century.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string with a `Z` suffix.
    ///
    /// Offsets other than `Z` are rejected, including `+00:00`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: "must use Z suffix (UTC only)".into(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ValidationError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "out of range".into(),
            })
    }

    /// The inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Shift by a signed number of seconds, saturating at the representable range.
    pub fn add_secs(&self, secs: i64) -> Self {
        self.0
            .checked_add_signed(Duration::seconds(secs))
            .map(Self)
            .unwrap_or(*self)
    }

    /// ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// A `YYMMDD` calendar date, interpreted in the 21st century.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassportDate(NaiveDate);

impl PassportDate {
    /// Parse six ASCII digits.
    pub fn parse_yymmdd(s: &str) -> Result<Self, ValidationError> {
        let bytes = s.as_bytes();
        if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(ValidationError::InvalidPassportDate(s.to_string()));
        }
        let mut digits = [0u8; 6];
        for (d, b) in digits.iter_mut().zip(bytes) {
            *d = b - b'0';
        }
        Self::from_digits(digits).map_err(|_| ValidationError::InvalidPassportDate(s.to_string()))
    }

    /// Build from six numeric digits, each `0..=9`.
    pub fn from_digits(digits: [u8; 6]) -> Result<Self, ValidationError> {
        let rendered = || digits.iter().map(|d| d.to_string()).collect::<String>();
        if digits.iter().any(|d| *d > 9) {
            return Err(ValidationError::InvalidPassportDate(rendered()));
        }
        let year = 2000 + i32::from(digits[0]) * 10 + i32::from(digits[1]);
        let month = u32::from(digits[2]) * 10 + u32::from(digits[3]);
        let day = u32::from(digits[4]) * 10 + u32::from(digits[5]);
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidPassportDate(rendered()))
    }

    /// Midnight UTC at the start of this date.
    pub fn midnight(&self) -> Timestamp {
        Timestamp(self.0.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// The calendar date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for PassportDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%y%m%d"))
    }
}

impl Serialize for PassportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PassportDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_yymmdd(&s).map_err(serde::de::Error::custom)
    }
}
