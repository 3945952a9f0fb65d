//! Timetable loading errors.

use std::path::PathBuf;

use crate::domain::{DayType, Direction, TimeError};

/// Errors that prevent a timetable from loading.
///
/// All of these are configuration errors: the server cannot answer
/// queries without a timetable, so startup aborts on any of them.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The timetable file could not be read
    #[error("failed to read timetable {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The timetable is not valid JSON of the expected shape
    #[error("malformed timetable JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A trip has a time that is not "HH:MM"
    #[error("trip {trip} ({day_type} {direction}) has invalid time {value:?} at {stop}: {source}")]
    InvalidTime {
        day_type: DayType,
        direction: Direction,
        trip: String,
        stop: String,
        value: String,
        #[source]
        source: TimeError,
    },

    /// A direction has no stops at all
    #[error("{day_type} {direction} schedule has no stops")]
    NoStops {
        day_type: DayType,
        direction: Direction,
    },
}
