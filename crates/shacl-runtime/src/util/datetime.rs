//! `xsd:dateTime` and `xsd:dateTimeStamp` parsing and formatting.
//!
//! Values carry a timestamp (seconds since the Unix epoch) and a timezone
//! offset in seconds. Literals are matched strictly:
//! - DateTime: `YYYY-MM-DDTHH:MM:SS` with an optional `Z` or `±HH:MM` suffix
//! - DateTimeStamp: the same, but the suffix is mandatory
//!
//! A missing offset is read as UTC. Offset zero is written with a trailing
//! `Z`; anything else is written as `±HH:MM`.

use std::fmt;

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const SECONDS_PER_MINUTE: i32 = 60;
const SECONDS_PER_HOUR: i32 = 60 * SECONDS_PER_MINUTE;

const BASE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

lazy_static! {
    static ref DATETIME_REGEX: Regex =
        Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2})(Z|[+-][0-9]{2}:[0-9]{2})?$")
            .expect("date-time pattern is valid");
    static ref DATETIME_STAMP_REGEX: Regex =
        Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2})(Z|[+-][0-9]{2}:[0-9]{2})$")
            .expect("date-time-stamp pattern is valid");
}

/// Error type for date-time parsing failures. Carries the offending literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date time string '{value}'")]
pub struct DateTimeParseError {
    pub value: String,
}

impl DateTimeParseError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// A point in time together with the offset it was expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    inner: chrono::DateTime<FixedOffset>,
}

impl DateTime {
    /// Creates a value from a Unix timestamp and an offset in seconds.
    ///
    /// Returns `None` if the timestamp is out of range or the offset is not
    /// strictly within ±24 hours.
    pub fn new(timestamp: i64, tz_offset_seconds: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(tz_offset_seconds)?;
        let utc = chrono::DateTime::<Utc>::from_timestamp(timestamp, 0)?;
        Some(Self {
            inner: utc.with_timezone(&offset),
        })
    }

    /// Creates a UTC value from a Unix timestamp.
    pub fn from_timestamp(timestamp: i64) -> Option<Self> {
        Self::new(timestamp, 0)
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.inner.timestamp()
    }

    /// Offset from UTC in seconds (east positive).
    pub fn tz_offset_seconds(&self) -> i32 {
        self.inner.offset().local_minus_utc()
    }

    /// Hour part of the offset. Carries the sign of the whole offset.
    pub fn tz_hour(&self) -> i32 {
        self.tz_offset_seconds() / SECONDS_PER_HOUR
    }

    /// Minute part of the offset. Never negative.
    pub fn tz_minute(&self) -> i32 {
        (self.tz_offset_seconds().abs() % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE
    }

    pub fn is_utc(&self) -> bool {
        self.tz_offset_seconds() == 0
    }

    pub fn as_chrono(&self) -> &chrono::DateTime<FixedOffset> {
        &self.inner
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTime {
    fn from(inner: chrono::DateTime<FixedOffset>) -> Self {
        Self { inner }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = if self.is_utc() { UTC_FORMAT } else { OFFSET_FORMAT };
        write!(f, "{}", self.inner.format(format))
    }
}

/// Parses a `±HH:MM` suffix into seconds east of UTC.
fn parse_offset(suffix: &str, literal: &str) -> Result<i32, DateTimeParseError> {
    if suffix == "Z" {
        return Ok(0);
    }

    let field = |range: std::ops::Range<usize>| -> Result<i32, DateTimeParseError> {
        suffix
            .get(range)
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| DateTimeParseError::new(literal))
    };

    let sign = if suffix.starts_with('-') { -1 } else { 1 };
    let hours = field(1..3)?;
    let minutes = field(4..6)?;

    if minutes >= 60 {
        return Err(DateTimeParseError::new(literal));
    }

    Ok(sign * (hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE))
}

fn parse_with(regex: &Regex, s: &str) -> Result<DateTime, DateTimeParseError> {
    let caps = regex.captures(s).ok_or_else(|| DateTimeParseError::new(s))?;

    let base = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let naive =
        NaiveDateTime::parse_from_str(base, BASE_FORMAT).map_err(|_| DateTimeParseError::new(s))?;

    let offset_seconds = match caps.get(2) {
        Some(suffix) => parse_offset(suffix.as_str(), s)?,
        None => 0,
    };
    let offset = FixedOffset::east_opt(offset_seconds).ok_or_else(|| DateTimeParseError::new(s))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(DateTime::from)
        .ok_or_else(|| DateTimeParseError::new(s))
}

/// Parses an `xsd:dateTime` literal (offset optional).
pub fn parse_datetime(s: &str) -> Result<DateTime, DateTimeParseError> {
    parse_with(&DATETIME_REGEX, s)
}

/// Parses an `xsd:dateTimeStamp` literal (offset mandatory).
pub fn parse_datetime_stamp(s: &str) -> Result<DateTime, DateTimeParseError> {
    parse_with(&DATETIME_STAMP_REGEX, s)
}

/// Formats a value in its canonical literal form.
pub fn format_datetime(value: &DateTime) -> String {
    value.to_string()
}
