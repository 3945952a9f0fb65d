//! "Next N buses" search.

use crate::domain::ClockTime;
use crate::timetable::DayTypeSchedule;

use super::TripResult;

/// Find up to `count` trips serving `departure` → `arrival` that leave
/// `departure` at or after `after`.
///
/// Trips are scanned in stored order and the scan stops once `count`
/// results are found, so the schedule must be stored in ascending
/// departure order. Ties keep stored order. An empty result means no more
/// buses on this schedule.
pub fn next_trips(
    schedule: &DayTypeSchedule,
    departure: &str,
    arrival: &str,
    after: ClockTime,
    count: usize,
    is_holiday: bool,
) -> Vec<TripResult> {
    schedule
        .trips()
        .iter()
        .filter_map(|trip| {
            let (dep, arr) = trip.times_between(departure, arrival)?;
            (dep >= after).then(|| TripResult::new(trip, dep, arr, is_holiday))
        })
        .take(count)
        .collect()
}
