//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DayType, Direction};
use crate::query::TripResult;

/// Most trips one request may ask for.
pub const MAX_TRIP_COUNT: usize = 20;

/// Trips listed when the request does not say.
pub const DEFAULT_TRIP_COUNT: usize = 2;

/// Query for the next departures.
#[derive(Debug, Deserialize)]
pub struct NextTripsRequest {
    /// "outbound" or "inbound"
    pub direction: String,

    /// Departure stop name
    pub from: String,

    /// Arrival stop name
    pub to: String,

    /// Number of trips (defaults to 2, capped at 20)
    pub count: Option<usize>,

    /// Earliest departure in HH:MM format (defaults to now, or 00:00
    /// when `date` is given)
    pub time: Option<String>,

    /// Service date in YYYY-MM-DD format (defaults to today)
    pub date: Option<String>,
}

/// Query for trips arriving by a deadline.
#[derive(Debug, Deserialize)]
pub struct ArriveByRequest {
    pub direction: String,
    pub from: String,
    pub to: String,

    /// Latest acceptable arrival in HH:MM format
    pub deadline: String,

    /// Service date in YYYY-MM-DD format (defaults to today)
    pub date: Option<String>,

    pub count: Option<usize>,
}

/// Query for a direction's stops.
#[derive(Debug, Deserialize)]
pub struct StopsRequest {
    pub direction: String,

    /// List stops from every day-type instead of today's
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripsResponse {
    pub direction: Direction,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub day_type: DayType,
    pub trips: Vec<TripResult>,
}

#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub direction: Direction,
    pub stops: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub day_type: DayType,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Clamp a requested trip count.
pub fn trip_count(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_TRIP_COUNT).min(MAX_TRIP_COUNT)
}
