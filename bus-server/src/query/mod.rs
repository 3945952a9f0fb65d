//! Timetable query engine.
//!
//! Answers the two questions the bot gets asked:
//!
//! - "When are the next buses?" ([`QueryEngine::find_next_trips`])
//! - "Which bus gets me there by HH:MM?" ([`QueryEngine::find_trips_arriving_by`])
//!
//! Both pick the weekday or holiday schedule for the relevant date, keep
//! only trips serving both requested stops, and return at most `count`
//! results. An empty result is a normal answer ("no buses"), never an
//! error. Stop names are not validated: an unknown stop simply matches no
//! trips.

mod arrive_by;
mod clock;
mod next;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::calendar;
use crate::domain::{ClockTime, DayType, Direction};
use crate::timetable::{ScheduledTrip, Timetable};

pub use arrive_by::trips_arriving_by;
pub use clock::{Clock, FixedClock, SystemClock};
pub use next::next_trips;

/// One bus option for a departure → arrival stop pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResult {
    /// Time the bus leaves the departure stop.
    pub departure_time: ClockTime,

    /// Time the bus reaches the arrival stop.
    pub arrival_time: ClockTime,

    /// Boarding gate, if the timetable names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,

    /// Whether this came from the holiday timetable.
    pub is_holiday: bool,
}

impl TripResult {
    fn new(
        trip: &ScheduledTrip,
        departure_time: ClockTime,
        arrival_time: ClockTime,
        is_holiday: bool,
    ) -> Self {
        Self {
            departure_time,
            arrival_time,
            gate: trip.gate().map(str::to_string),
            is_holiday,
        }
    }
}

/// Query engine over an immutable timetable.
///
/// Cheap to clone; all clones share the same timetable and clock.
#[derive(Clone)]
pub struct QueryEngine {
    timetable: Arc<Timetable>,
    clock: Arc<dyn Clock>,
}

impl QueryEngine {
    /// Create an engine that reads "now" from the system clock.
    pub fn new(timetable: Arc<Timetable>) -> Self {
        Self::with_clock(timetable, Arc::new(SystemClock))
    }

    /// Create an engine with a custom clock.
    pub fn with_clock(timetable: Arc<Timetable>, clock: Arc<dyn Clock>) -> Self {
        Self { timetable, clock }
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Current local date-time according to the engine's clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Day-type in effect today.
    pub fn day_type_today(&self) -> DayType {
        calendar::day_type_for(self.clock.today())
    }

    /// Next `count` trips leaving `departure` at or after `reference`.
    ///
    /// The schedule is chosen by `reference`'s date; only its time of day
    /// filters departures.
    pub fn find_next_trips(
        &self,
        direction: Direction,
        departure: &str,
        arrival: &str,
        count: usize,
        reference: NaiveDateTime,
    ) -> Vec<TripResult> {
        let day_type = calendar::day_type_for(reference.date());
        let schedule = self.timetable.schedule_for(direction, day_type);

        let results = next_trips(
            schedule,
            departure,
            arrival,
            ClockTime::from(reference),
            count,
            day_type.is_holiday(),
        );

        debug!(
            %direction,
            departure,
            arrival,
            %day_type,
            after = %ClockTime::from(reference),
            found = results.len(),
            "next trips"
        );

        results
    }

    /// Next `count` trips leaving from now.
    pub fn find_next_trips_now(
        &self,
        direction: Direction,
        departure: &str,
        arrival: &str,
        count: usize,
    ) -> Vec<TripResult> {
        self.find_next_trips(direction, departure, arrival, count, self.clock.now())
    }

    /// Up to `count` trips on `target_date` arriving at `arrival` no later
    /// than `deadline`, latest arrival first.
    ///
    /// When `target_date` is today, trips that have already left
    /// `departure` are excluded. A deadline very close to now can
    /// therefore yield nothing even though a bus is on its way.
    pub fn find_trips_arriving_by(
        &self,
        direction: Direction,
        departure: &str,
        arrival: &str,
        deadline: ClockTime,
        target_date: NaiveDate,
        count: usize,
    ) -> Vec<TripResult> {
        let day_type = calendar::day_type_for(target_date);
        let schedule = self.timetable.schedule_for(direction, day_type);

        let now = self.clock.now();
        let not_before = (target_date == now.date()).then(|| ClockTime::from(now));

        let results = trips_arriving_by(
            schedule,
            departure,
            arrival,
            deadline,
            not_before,
            count,
            day_type.is_holiday(),
        );

        debug!(
            %direction,
            departure,
            arrival,
            %deadline,
            %target_date,
            %day_type,
            found = results.len(),
            "trips arriving by deadline"
        );

        results
    }

    /// Stops for `direction` on today's day-type, in route order.
    pub fn stops_today(&self, direction: Direction) -> &[String] {
        self.timetable.stops_for(direction, self.day_type_today())
    }

    /// Stops for `direction` across both day-types.
    pub fn all_stops_union(&self, direction: Direction) -> Vec<String> {
        self.timetable.all_stops_union(direction)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ClockTime;
    use crate::timetable::{DayTypeSchedule, ScheduledTrip};

    pub fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    /// Three A → B trips: 07:00→07:20 (also calls at C), 07:30→07:50,
    /// 08:00→08:20.
    pub fn sample_schedule() -> DayTypeSchedule {
        DayTypeSchedule::new(
            vec!["A".into(), "C".into(), "B".into()],
            vec![
                ScheduledTrip::new(
                    "1",
                    Some("1番のりば".into()),
                    [("A", t("07:00")), ("C", t("07:10")), ("B", t("07:20"))],
                ),
                ScheduledTrip::new("2", None, [("A", t("07:30")), ("B", t("07:50"))]),
                ScheduledTrip::new("3", None, [("A", t("08:00")), ("B", t("08:20"))]),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{sample_schedule, t};
    use super::*;
    use crate::timetable::{DayTypeSchedule, ScheduledTrip};

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    /// Weekday outbound is the sample schedule; holiday outbound has a
    /// single 10:00 → 10:20 trip.
    fn engine(now: NaiveDateTime) -> QueryEngine {
        let holiday = DayTypeSchedule::new(
            vec!["A".into(), "B".into()],
            vec![ScheduledTrip::new(
                "h1",
                Some("臨時".into()),
                [("A", t("10:00")), ("B", t("10:20"))],
            )],
        );
        let timetable = Timetable::builder()
            .schedule(Direction::Outbound, DayType::Weekday, sample_schedule())
            .schedule(Direction::Outbound, DayType::Holiday, holiday)
            .build();
        QueryEngine::with_clock(Arc::new(timetable), Arc::new(FixedClock(now)))
    }

    // Monday 2026-10-19, Saturday 2026-10-17, Sports Day 2026-10-12 (Mon)

    #[test]
    fn next_trips_on_weekday() {
        let engine = engine(at(2026, 10, 19, 7, 10));
        let trips = engine.find_next_trips_now(Direction::Outbound, "A", "B", 2);

        assert_eq!(trips.len(), 2);
        assert_eq!((trips[0].departure_time, trips[0].arrival_time), (t("07:30"), t("07:50")));
        assert_eq!((trips[1].departure_time, trips[1].arrival_time), (t("08:00"), t("08:20")));
        assert!(trips.iter().all(|r| !r.is_holiday));
    }

    #[test]
    fn next_trips_uses_holiday_schedule_on_weekend() {
        let engine = engine(at(2026, 10, 17, 7, 10));
        let trips = engine.find_next_trips_now(Direction::Outbound, "A", "B", 2);

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].departure_time, t("10:00"));
        assert_eq!(trips[0].gate.as_deref(), Some("臨時"));
        assert!(trips[0].is_holiday);
    }

    #[test]
    fn next_trips_uses_holiday_schedule_on_public_holiday() {
        let engine = engine(at(2026, 10, 19, 0, 0));
        let trips = engine.find_next_trips(
            Direction::Outbound,
            "A",
            "B",
            2,
            at(2026, 10, 12, 6, 0),
        );
        assert_eq!(trips.len(), 1);
        assert!(trips[0].is_holiday);
    }

    #[test]
    fn next_trips_reference_date_chooses_schedule() {
        // Clock says Saturday but the reference is a Monday
        let engine = engine(at(2026, 10, 17, 12, 0));
        let trips = engine.find_next_trips(
            Direction::Outbound,
            "A",
            "B",
            2,
            at(2026, 10, 19, 5, 0),
        );
        let deps: Vec<_> = trips.iter().map(|r| r.departure_time).collect();
        assert_eq!(deps, [t("07:00"), t("07:30")]);
    }

    #[test]
    fn empty_direction_returns_nothing() {
        let engine = engine(at(2026, 10, 19, 5, 0));
        assert!(
            engine
                .find_next_trips_now(Direction::Inbound, "B", "A", 2)
                .is_empty()
        );
    }

    #[test]
    fn arrive_by_today_applies_now_floor() {
        let engine = engine(at(2026, 10, 19, 6, 0));
        let trips = engine.find_trips_arriving_by(
            Direction::Outbound,
            "A",
            "B",
            t("08:00"),
            at(2026, 10, 19, 0, 0).date(),
            2,
        );

        assert_eq!(trips.len(), 2);
        assert_eq!((trips[0].departure_time, trips[0].arrival_time), (t("07:30"), t("07:50")));
        assert_eq!((trips[1].departure_time, trips[1].arrival_time), (t("07:00"), t("07:20")));
    }

    #[test]
    fn arrive_by_today_excludes_departed_trips() {
        let engine = engine(at(2026, 10, 19, 7, 15));
        let trips = engine.find_trips_arriving_by(
            Direction::Outbound,
            "A",
            "B",
            t("08:00"),
            at(2026, 10, 19, 0, 0).date(),
            2,
        );
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].departure_time, t("07:30"));
    }

    #[test]
    fn arrive_by_other_day_ignores_clock() {
        // Late on Monday, asking about Tuesday morning
        let engine = engine(at(2026, 10, 19, 22, 0));
        let trips = engine.find_trips_arriving_by(
            Direction::Outbound,
            "A",
            "B",
            t("08:00"),
            at(2026, 10, 20, 0, 0).date(),
            2,
        );
        assert_eq!(trips.len(), 2);
    }

    #[test]
    fn arrive_by_past_deadline_today_is_empty() {
        let engine = engine(at(2026, 10, 19, 9, 0));
        let trips = engine.find_trips_arriving_by(
            Direction::Outbound,
            "A",
            "B",
            t("08:30"),
            at(2026, 10, 19, 0, 0).date(),
            2,
        );
        assert!(trips.is_empty());
    }

    #[test]
    fn arrive_by_holiday_date() {
        let engine = engine(at(2026, 10, 19, 6, 0));
        let trips = engine.find_trips_arriving_by(
            Direction::Outbound,
            "A",
            "B",
            t("11:00"),
            at(2026, 10, 18, 0, 0).date(),
            2,
        );
        assert_eq!(trips.len(), 1);
        assert!(trips[0].is_holiday);
    }

    #[test]
    fn stops_today_follows_day_type() {
        let weekday = engine(at(2026, 10, 19, 6, 0));
        assert_eq!(weekday.stops_today(Direction::Outbound), ["A", "C", "B"]);

        let holiday = engine(at(2026, 10, 18, 6, 0));
        assert_eq!(holiday.stops_today(Direction::Outbound), ["A", "B"]);
        assert_eq!(holiday.all_stops_union(Direction::Outbound), ["A", "C", "B"]);
    }

    #[test]
    fn trip_result_serializes_camel_case() {
        let result = TripResult {
            departure_time: t("07:30"),
            arrival_time: t("07:50"),
            gate: None,
            is_holiday: false,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "departureTime": "07:30",
                "arrivalTime": "07:50",
                "isHoliday": false
            })
        );
    }

    #[test]
    fn embedded_timetable_answers_default_route() {
        let timetable = Arc::new(Timetable::embedded().unwrap());
        let engine =
            QueryEngine::with_clock(timetable, Arc::new(FixedClock(at(2026, 10, 19, 7, 0))));

        let trips = engine.find_next_trips_now(Direction::Outbound, "西条駅", "会社", 2);
        assert_eq!(trips.len(), 2);
        assert!(trips[0].departure_time >= t("07:00"));
        assert!(trips[0].arrival_time > trips[0].departure_time);
    }
}
