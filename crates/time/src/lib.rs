//! Civil time, Julian Date, and sidereal time conversions.
//!
//! Everything here is a pure function of its arguments. Julian Dates are
//! UTC-based and treated as valid for roughly 1800 to 2200 CE.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use thiserror::Error;

pub mod julian;
pub mod sidereal;

pub use julian::{from_julian_date, julian_centuries, to_julian_date};
pub use sidereal::{gmst, lmst};

/// Errors raised while constructing or parsing civil date/times.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("invalid civil date/time: {0}")]
    InvalidDate(String),
    #[error("unable to parse epoch `{0}` (expected YYYY-MM-DD[ HH:MM[:SS]])")]
    Parse(String),
}

/// Broken-down UTC calendar date and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl CivilDateTime {
    /// Build a validated date/time.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self, TimeError> {
        if !(1..=12).contains(&month) {
            return Err(TimeError::InvalidDate(format!("month {month} out of range")));
        }
        if !(1..=31).contains(&day) {
            return Err(TimeError::InvalidDate(format!("day {day} out of range")));
        }
        if hour > 23 || minute > 59 {
            return Err(TimeError::InvalidDate(format!(
                "time {hour:02}:{minute:02} out of range"
            )));
        }
        if !(0.0..60.0).contains(&second) {
            return Err(TimeError::InvalidDate(format!("second {second} out of range")));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Midnight UTC on the given calendar day.
    pub fn date(year: i32, month: u32, day: u32) -> Result<Self, TimeError> {
        Self::new(year, month, day, 0, 0, 0.0)
    }

    /// Fraction of the day elapsed, in `[0, 1)`.
    pub fn day_fraction(&self) -> f64 {
        (self.hour as f64 + self.minute as f64 / 60.0 + self.second / 3600.0) / 24.0
    }

    /// Julian Date of this instant.
    pub fn to_julian_date(&self) -> f64 {
        to_julian_date(self)
    }

    /// Convert to a chrono timestamp, if the calendar fields are representable.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let whole = self.second.floor();
        let nanos = ((self.second - whole) * 1e9).round().min(999_999_999.0) as u32;
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_nano_opt(
            self.hour,
            self.minute,
            whole as u32,
            nanos,
        )
    }
}

impl From<NaiveDateTime> for CivilDateTime {
    fn from(value: NaiveDateTime) -> Self {
        Self {
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: value.hour(),
            minute: value.minute(),
            second: value.second() as f64 + value.nanosecond() as f64 * 1e-9,
        }
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:06.3} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a UTC epoch string such as `2024-11-15 18:00`, `2024-11-15T18:00:00Z`,
/// or a bare `2024-11-15` (midnight).
pub fn parse_utc(input: &str) -> Result<CivilDateTime, TimeError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_suffix(" UTC")
        .or_else(|| trimmed.strip_suffix('Z'))
        .unwrap_or(trimmed);
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.into());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(CivilDateTime::from)
        .ok_or_else(|| TimeError::Parse(input.to_string()))
}

/// Julian Date for the current system clock.
pub fn now_as_jd() -> f64 {
    let millis = Utc::now().timestamp_millis() as f64;
    parallax_core::constants::UNIX_EPOCH_JD
        + parallax_core::time::seconds_to_days(millis / 1_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(CivilDateTime::new(2024, 13, 1, 0, 0, 0.0).is_err());
        assert!(CivilDateTime::new(2024, 1, 0, 0, 0, 0.0).is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 24, 0, 0.0).is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 0, 60, 0.0).is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 0, 0, 60.0).is_err());
        assert!(CivilDateTime::new(2024, 2, 29, 23, 59, 59.5).is_ok());
    }

    #[test]
    fn parses_common_epoch_forms() {
        let a = parse_utc("2024-11-15 18:00").expect("space form");
        let b = parse_utc("2024-11-15T18:00:00Z").expect("iso form");
        assert_eq!(a, b);
        let midnight = parse_utc("2000-01-01").expect("date only");
        assert_eq!(midnight.hour, 0);
        assert!(parse_utc("yesterday").is_err());
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_as_jd() > 2_458_849.5);
    }

    #[test]
    fn chrono_round_trip_keeps_fields() {
        let dt = CivilDateTime::new(1999, 12, 31, 23, 59, 30.25).expect("valid");
        let naive = dt.to_naive().expect("representable");
        let back = CivilDateTime::from(naive);
        assert_eq!(back.minute, 59);
        approx::assert_abs_diff_eq!(back.second, 30.25, epsilon = 1e-6);
    }
}
