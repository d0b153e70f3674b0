//! Schedule time handling.
//!
//! GTFS-style schedules give arrival times as "HH:MM:SS" strings measured
//! from the start of the service day, so a trip finishing after midnight is
//! listed as "24:10:00" or "25:30:00". This module turns those strings into
//! absolute timestamps, and builds the reference instant a rider's request
//! is compared against.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Largest client time-zone offset accepted, in minutes either side of UTC.
const MAX_OFFSET_MINUTES: i64 = 24 * 60;

/// Error returned when a schedule time string cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed schedule time {input:?}: {reason}")]
pub struct MalformedTime {
    input: String,
    reason: &'static str,
}

impl MalformedTime {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The offending input string.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A validated schedule time, possibly past midnight of the service day.
///
/// # Examples
///
/// ```
/// use stop_server::domain::ScheduleTime;
///
/// let t = ScheduleTime::parse("25:30:00").unwrap();
/// assert_eq!(t.valid_hour(), 1);
/// assert_eq!(t.extra_days(), 1);
/// assert_eq!(t.to_string(), "25:30:00");
///
/// assert!(ScheduleTime::parse("24:60:00").is_err());
/// assert!(ScheduleTime::parse("ab:00:00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleTime {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl ScheduleTime {
    /// Parse an "HH:MM:SS" string. `HH` may be any non-negative integer.
    pub fn parse(s: &str) -> Result<Self, MalformedTime> {
        let mut fields = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(MalformedTime::new(s, "expected HH:MM:SS"));
        };

        let hours = parse_field(h).ok_or_else(|| MalformedTime::new(s, "invalid hour"))?;
        let minutes = parse_field(m).ok_or_else(|| MalformedTime::new(s, "invalid minute"))?;
        let seconds = parse_field(sec).ok_or_else(|| MalformedTime::new(s, "invalid second"))?;

        if minutes > 59 {
            return Err(MalformedTime::new(s, "minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(MalformedTime::new(s, "second must be 0-59"));
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Hour of the calendar day this time falls on (0-23).
    pub fn valid_hour(&self) -> u32 {
        self.hours % 24
    }

    /// Whole days past the service day's date.
    pub fn extra_days(&self) -> u32 {
        self.hours / 24
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Resolve this time against a service day, advancing the date when the
    /// hour is 24 or more.
    ///
    /// Returns `None` if the resulting date is out of range.
    pub fn on(&self, service_day: NaiveDate) -> Option<NaiveDateTime> {
        let date = service_day.checked_add_days(Days::new(u64::from(self.extra_days())))?;
        let time = NaiveTime::from_hms_opt(self.valid_hour(), self.minutes, self.seconds)?;
        Some(date.and_time(time))
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// A field must be a non-empty run of ASCII digits.
fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Resolve a raw schedule time against a service day.
///
/// # Examples
///
/// ```
/// use stop_server::domain::normalize;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let late = normalize("24:15:00", day).unwrap();
/// assert_eq!(late.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
/// assert_eq!(late.format("%H:%M:%S").to_string(), "00:15:00");
/// ```
pub fn normalize(raw_time: &str, service_day: NaiveDate) -> Result<NaiveDateTime, MalformedTime> {
    ScheduleTime::parse(raw_time)?
        .on(service_day)
        .ok_or_else(|| MalformedTime::new(raw_time, "date out of range"))
}

/// Error returned when a client-supplied reference time is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReference {
    #[error("invalid reference date {0:?}: expected an RFC 3339 timestamp")]
    Date(String),

    #[error("time-zone offset {0} minutes is out of range")]
    Offset(i64),
}

/// The instant a rider's request is evaluated at, in the rider's local
/// wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceInstant(NaiveDateTime);

impl ReferenceInstant {
    /// Build from a client timestamp and its time-zone offset.
    ///
    /// `offset_minutes` follows the browser convention of UTC minus local
    /// time, so UTC+2 is `-120`. The offset is subtracted from the UTC
    /// instant to obtain the client's wall clock.
    ///
    /// # Examples
    ///
    /// ```
    /// use stop_server::domain::ReferenceInstant;
    ///
    /// let r = ReferenceInstant::from_client("2024-03-15T21:30:00.000Z", -120).unwrap();
    /// assert_eq!(r.as_datetime().format("%H:%M").to_string(), "23:30");
    /// ```
    pub fn from_client(reference_date: &str, offset_minutes: i64) -> Result<Self, InvalidReference> {
        if offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(InvalidReference::Offset(offset_minutes));
        }

        let utc = DateTime::parse_from_rfc3339(reference_date.trim())
            .map_err(|_| InvalidReference::Date(reference_date.to_string()))?
            .naive_utc();

        utc.checked_sub_signed(Duration::minutes(offset_minutes))
            .map(Self)
            .ok_or_else(|| InvalidReference::Date(reference_date.to_string()))
    }

    /// The calendar date used as the service day for normalization.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_date()(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28  // Safe for all months
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    proptest! {
        /// Hours up to 47 land on the service day or the day after
        #[test]
        fn service_day_rollover(
            hour in 0u32..48,
            minute in 0u32..60,
            second in 0u32..60,
            day in valid_date()
        ) {
            let raw = format!("{:02}:{:02}:{:02}", hour, minute, second);
            let t = normalize(&raw, day).unwrap();

            let expected_date = if hour >= 24 { day.succ_opt().unwrap() } else { day };
            prop_assert_eq!(t.date(), expected_date);
            prop_assert_eq!(t.hour(), hour % 24);
            prop_assert_eq!(t.minute(), minute);
            prop_assert_eq!(t.second(), second);
        }

        /// Same inputs always give the same timestamp
        #[test]
        fn normalize_deterministic(hour in 0u32..100, minute in 0u32..60, day in valid_date()) {
            let raw = format!("{:02}:{:02}:00", hour, minute);
            prop_assert_eq!(normalize(&raw, day), normalize(&raw, day));
        }

        /// Parse then display roundtrips for zero-padded input
        #[test]
        fn parse_display_roundtrip(hour in 0u32..100, minute in 0u32..60, second in 0u32..60) {
            let raw = format!("{:02}:{:02}:{:02}", hour, minute, second);
            prop_assert_eq!(ScheduleTime::parse(&raw).unwrap().to_string(), raw);
        }

        /// Out-of-range minutes are rejected
        #[test]
        fn invalid_minute_rejected(hour in 0u32..48, minute in 60u32..100) {
            let raw = format!("{:02}:{:02}:00", hour, minute);
            prop_assert!(ScheduleTime::parse(&raw).is_err());
        }

        /// Out-of-range seconds are rejected
        #[test]
        fn invalid_second_rejected(hour in 0u32..48, second in 60u32..100) {
            let raw = format!("{:02}:00:{:02}", hour, second);
            prop_assert!(ScheduleTime::parse(&raw).is_err());
        }
    }
}
