//! Route direction and service day-type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction: {0:?} (expected \"outbound\" or \"inbound\")")]
pub struct InvalidDirection(pub String);

/// Which leg of the fixed route a trip runs on.
///
/// Outbound runs from the station towards the company; inbound is the
/// return trip, with its stops in reversed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Both directions, outbound first.
    pub const ALL: [Direction; 2] = [Direction::Outbound, Direction::Inbound];

    /// The lowercase wire name ("outbound" / "inbound").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
        }
    }

    /// Short label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Outbound => "🚌 行き",
            Direction::Inbound => "🏠 帰り",
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outbound" => Ok(Direction::Outbound),
            "inbound" => Ok(Direction::Inbound),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service pattern for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Holiday,
}

impl DayType {
    /// Day-type for a holiday flag.
    pub fn from_holiday(is_holiday: bool) -> Self {
        if is_holiday {
            DayType::Holiday
        } else {
            DayType::Weekday
        }
    }

    pub fn is_holiday(&self) -> bool {
        matches!(self, DayType::Holiday)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Holiday => "holiday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_direction() {
        assert_eq!("outbound".parse::<Direction>(), Ok(Direction::Outbound));
        assert_eq!("inbound".parse::<Direction>(), Ok(Direction::Inbound));
        assert!("Outbound".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn direction_display_roundtrip() {
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn direction_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Inbound).unwrap(),
            "\"inbound\""
        );
    }

    #[test]
    fn invalid_direction_message() {
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid direction: \"sideways\" (expected \"outbound\" or \"inbound\")"
        );
    }

    #[test]
    fn day_type_from_flag() {
        assert_eq!(DayType::from_holiday(true), DayType::Holiday);
        assert_eq!(DayType::from_holiday(false), DayType::Weekday);
        assert!(DayType::Holiday.is_holiday());
        assert!(!DayType::Weekday.is_holiday());
    }
}
