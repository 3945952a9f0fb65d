//! Timetable file DTOs.
//!
//! These types map directly to the JSON timetable file. Times are kept as
//! strings here and validated during conversion to domain types.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Top level of the timetable file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimetable {
    pub weekday: RawDayTypeSchedule,
    pub holiday: RawDayTypeSchedule,
}

/// Both directions for one day-type.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDayTypeSchedule {
    pub outbound: RawDirectionData,
    pub inbound: RawDirectionData,
}

/// Stops and trips for one direction.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDirectionData {
    /// Human-readable route name (e.g. "西条駅 → 会社").
    #[serde(default)]
    pub name: Option<String>,

    /// Stops in route order.
    pub stops: Vec<String>,

    /// Trips, expected in ascending time order.
    pub schedules: Vec<RawTrip>,
}

/// One scheduled bus run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrip {
    pub id: RawTripId,

    /// Boarding gate label, if the stop has several.
    #[serde(default)]
    pub gate: Option<String>,

    /// Stop name to "HH:MM". `null` means the trip does not call there.
    pub stops: HashMap<String, Option<String>>,
}

/// Trip identifiers appear as numbers in older files and strings in newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawTripId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawTripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTripId::Number(n) => write!(f, "{n}"),
            RawTripId::Text(s) => f.write_str(s),
        }
    }
}
