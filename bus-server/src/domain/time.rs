//! Clock times for timetable data.
//!
//! The timetable stores times as "HH:MM" strings with no date attached.
//! Which calendar day a time belongs to is decided by the caller (via the
//! day-type classification), so [`ClockTime`] is deliberately date-free and
//! compares by minutes since midnight.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute resolution.
///
/// # Examples
///
/// ```
/// use bus_server::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("07:30").unwrap();
/// assert_eq!(time.minutes_since_midnight(), 450);
/// assert_eq!(time.to_string(), "07:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Number of minutes in a day.
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Create a time from hour and minute, if both are in range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Create a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Parse a time from strict "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("7:30").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// assert!(ClockTime::parse_hhmm("07-30").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Minutes since midnight (0..1440).
    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Converts to a chrono `NaiveTime`.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for ClockTime {
    /// Truncates seconds.
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl From<NaiveDateTime> for ClockTime {
    fn from(datetime: NaiveDateTime) -> Self {
        datetime.time().into()
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hhmm(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ClockTime::parse_hhmm("14:30").unwrap();
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.minutes_since_midnight(), 870);

        assert_eq!(
            ClockTime::parse_hhmm("00:00").unwrap().minutes_since_midnight(),
            0
        );
        assert_eq!(
            ClockTime::parse_hhmm("23:59").unwrap().minutes_since_midnight(),
            1439
        );
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ClockTime::parse_hhmm("").is_err());
        assert!(ClockTime::parse_hhmm("1430").is_err());
        assert!(ClockTime::parse_hhmm("14:3").is_err());
        assert!(ClockTime::parse_hhmm("14:300").is_err());
        assert!(ClockTime::parse_hhmm("14-30").is_err());
        assert!(ClockTime::parse_hhmm("ab:cd").is_err());
        assert!(ClockTime::parse_hhmm(" 9:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ClockTime::parse_hhmm("24:00").is_err());
        assert!(ClockTime::parse_hhmm("12:60").is_err());
        assert!(ClockTime::parse_hhmm("99:99").is_err());
    }

    #[test]
    fn display_zero_pads() {
        assert_eq!(ClockTime::from_hm(7, 5).unwrap().to_string(), "07:05");
        assert_eq!(ClockTime::from_hm(0, 0).unwrap().to_string(), "00:00");
    }

    #[test]
    fn ordering_follows_minutes() {
        let early = ClockTime::parse_hhmm("07:00").unwrap();
        let late = ClockTime::parse_hhmm("07:01").unwrap();
        assert!(early < late);
    }

    #[test]
    fn from_naive_time_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(7, 10, 59).unwrap();
        assert_eq!(ClockTime::from(t), ClockTime::from_hm(7, 10).unwrap());
    }

    #[test]
    fn from_minutes_bounds() {
        assert!(ClockTime::from_minutes(1439).is_some());
        assert!(ClockTime::from_minutes(1440).is_none());
    }

    #[test]
    fn serde_as_string() {
        let t = ClockTime::from_hm(8, 20).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"08:20\"");

        let back: ClockTime = serde_json::from_str("\"08:20\"").unwrap();
        assert_eq!(back, t);

        assert!(serde_json::from_str::<ClockTime>("\"8:20\"").is_err());
    }
}
