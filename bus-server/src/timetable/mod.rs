//! Static bus timetable.
//!
//! The timetable is loaded once at startup from a JSON file (or the copy
//! compiled into the binary) and never changes afterwards. It is shared by
//! `Arc` between request handlers without any locking.
//!
//! The file holds one schedule per (day-type, direction) pair:
//!
//! ```json
//! { "weekday": { "outbound": {...}, "inbound": {...} },
//!   "holiday": { "outbound": {...}, "inbound": {...} } }
//! ```

mod error;
mod raw;
mod stops;

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::domain::{ClockTime, DayType, Direction};

pub use error::TimetableError;
pub use raw::{RawDayTypeSchedule, RawDirectionData, RawTimetable, RawTrip, RawTripId};

/// Timetable shipped with the server.
const EMBEDDED_TIMETABLE: &str = include_str!("../../data/schedules.json");

/// One scheduled bus run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTrip {
    id: String,
    gate: Option<String>,
    times: HashMap<String, ClockTime>,
}

impl ScheduledTrip {
    /// Create a trip from its calling times.
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        gate: Option<String>,
        times: impl IntoIterator<Item = (S, ClockTime)>,
    ) -> Self {
        Self {
            id: id.into(),
            gate,
            times: times.into_iter().map(|(s, t)| (s.into(), t)).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Boarding gate label, if any.
    pub fn gate(&self) -> Option<&str> {
        self.gate.as_deref()
    }

    /// Time the bus is at `stop`, or `None` if it does not call there.
    pub fn time_at(&self, stop: &str) -> Option<ClockTime> {
        self.times.get(stop).copied()
    }

    /// Departure and arrival times if the trip serves both stops.
    pub fn times_between(&self, departure: &str, arrival: &str) -> Option<(ClockTime, ClockTime)> {
        Some((self.time_at(departure)?, self.time_at(arrival)?))
    }
}

/// Stops and trips for one direction on one day-type.
///
/// Trips are kept in file order, which is expected to be ascending by time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTypeSchedule {
    name: Option<String>,
    stops: Vec<String>,
    trips: Vec<ScheduledTrip>,
}

impl DayTypeSchedule {
    pub fn new(stops: Vec<String>, trips: Vec<ScheduledTrip>) -> Self {
        Self {
            name: None,
            stops,
            trips,
        }
    }

    /// Route name from the timetable file, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stops in route order.
    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    /// Trips in stored order.
    pub fn trips(&self) -> &[ScheduledTrip] {
        &self.trips
    }
}

/// The full timetable: a schedule for each direction and day-type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    schedules: [DayTypeSchedule; 4],
}

fn slot(direction: Direction, day_type: DayType) -> usize {
    match (day_type, direction) {
        (DayType::Weekday, Direction::Outbound) => 0,
        (DayType::Weekday, Direction::Inbound) => 1,
        (DayType::Holiday, Direction::Outbound) => 2,
        (DayType::Holiday, Direction::Inbound) => 3,
    }
}

impl Timetable {
    /// Start building a timetable in code.
    pub fn builder() -> TimetableBuilder {
        TimetableBuilder::default()
    }

    /// Load the timetable compiled into the binary.
    pub fn embedded() -> Result<Self, TimetableError> {
        Self::from_json_str(EMBEDDED_TIMETABLE)
    }

    /// Load a timetable from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TimetableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parse and validate a timetable from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, TimetableError> {
        let raw: RawTimetable = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Convert file DTOs into a validated timetable.
    pub fn from_raw(raw: RawTimetable) -> Result<Self, TimetableError> {
        let RawTimetable { weekday, holiday } = raw;
        let mut builder = Self::builder();

        for (day_type, day) in [(DayType::Weekday, weekday), (DayType::Holiday, holiday)] {
            let RawDayTypeSchedule { outbound, inbound } = day;
            for (direction, data) in [(Direction::Outbound, outbound), (Direction::Inbound, inbound)]
            {
                let schedule = convert_direction(data, day_type, direction)?;
                debug!(
                    %day_type,
                    %direction,
                    route = schedule.name().unwrap_or("unnamed"),
                    stops = schedule.stops().len(),
                    trips = schedule.trips().len(),
                    "parsed schedule"
                );
                builder = builder.schedule(direction, day_type, schedule);
            }
        }

        Ok(builder.build())
    }

    /// The schedule for a direction on a day-type.
    pub fn schedule_for(&self, direction: Direction, day_type: DayType) -> &DayTypeSchedule {
        &self.schedules[slot(direction, day_type)]
    }

    /// Total number of trips across all schedules.
    pub fn trip_count(&self) -> usize {
        self.schedules.iter().map(|s| s.trips.len()).sum()
    }
}

/// Builder for assembling a timetable in code.
///
/// Schedules that are never set stay empty.
#[derive(Debug, Default)]
pub struct TimetableBuilder {
    inner: Timetable,
}

impl TimetableBuilder {
    /// Set the schedule for a direction and day-type.
    pub fn schedule(
        mut self,
        direction: Direction,
        day_type: DayType,
        schedule: DayTypeSchedule,
    ) -> Self {
        self.inner.schedules[slot(direction, day_type)] = schedule;
        self
    }

    pub fn build(self) -> Timetable {
        self.inner
    }
}

fn convert_direction(
    data: RawDirectionData,
    day_type: DayType,
    direction: Direction,
) -> Result<DayTypeSchedule, TimetableError> {
    if data.stops.is_empty() {
        return Err(TimetableError::NoStops {
            day_type,
            direction,
        });
    }

    let mut trips = Vec::with_capacity(data.schedules.len());

    for raw_trip in data.schedules {
        let trip_id = raw_trip.id.to_string();
        let mut times = HashMap::with_capacity(raw_trip.stops.len());

        for (stop, value) in raw_trip.stops {
            // Empty strings and nulls both mean "does not call here"
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            let time = ClockTime::parse_hhmm(&value).map_err(|source| {
                TimetableError::InvalidTime {
                    day_type,
                    direction,
                    trip: trip_id.clone(),
                    stop: stop.clone(),
                    value: value.clone(),
                    source,
                }
            })?;
            if !data.stops.contains(&stop) {
                debug!(trip = %trip_id, %stop, "trip calls at a stop missing from the stop list");
            }
            times.insert(stop, time);
        }

        trips.push(ScheduledTrip {
            id: trip_id,
            gate: raw_trip.gate,
            times,
        });
    }

    Ok(DayTypeSchedule {
        name: data.name,
        stops: data.stops,
        trips,
    })
}
