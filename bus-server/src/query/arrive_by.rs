//! "Arrive by a deadline" search.

use crate::domain::ClockTime;
use crate::timetable::DayTypeSchedule;

use super::TripResult;

/// Find up to `count` trips serving `departure` → `arrival` that arrive no
/// later than `deadline`, latest arrival first.
///
/// When `not_before` is set, trips leaving `departure` before it are
/// dropped; callers set it to the current time when searching today.
///
/// Unlike [`next_trips`](super::next_trips) this scans every trip, since
/// the ordering is by arrival rather than storage order. Equal arrivals
/// keep stored order.
pub fn trips_arriving_by(
    schedule: &DayTypeSchedule,
    departure: &str,
    arrival: &str,
    deadline: ClockTime,
    not_before: Option<ClockTime>,
    count: usize,
    is_holiday: bool,
) -> Vec<TripResult> {
    let mut candidates: Vec<TripResult> = schedule
        .trips()
        .iter()
        .filter_map(|trip| {
            let (dep, arr) = trip.times_between(departure, arrival)?;
            let departs_in_time = not_before.is_none_or(|floor| dep >= floor);
            (arr <= deadline && departs_in_time)
                .then(|| TripResult::new(trip, dep, arr, is_holiday))
        })
        .collect();

    candidates.sort_by(|a, b| b.arrival_time.cmp(&a.arrival_time));
    candidates.truncate(count);
    candidates
}
