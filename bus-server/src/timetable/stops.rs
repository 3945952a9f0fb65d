//! Stop registry.
//!
//! Stop lists are returned in route order, which is what stop-selection
//! menus must show.

use std::collections::HashSet;

use crate::domain::{DayType, Direction};

use super::Timetable;

impl Timetable {
    /// Stops for a direction on a day-type, in route order.
    pub fn stops_for(&self, direction: Direction, day_type: DayType) -> &[String] {
        self.schedule_for(direction, day_type).stops()
    }

    /// Every stop served in `direction` on any day-type.
    ///
    /// The weekday list comes first in route order, followed by stops that
    /// only appear on the holiday schedule.
    pub fn all_stops_union(&self, direction: Direction) -> Vec<String> {
        let weekday = self.stops_for(direction, DayType::Weekday);
        let holiday = self.stops_for(direction, DayType::Holiday);

        let mut seen = HashSet::with_capacity(weekday.len() + holiday.len());
        weekday
            .iter()
            .chain(holiday)
            .filter(|stop| seen.insert(stop.as_str()))
            .cloned()
            .collect()
    }

    /// Whether `stop` appears in `direction` on any day-type.
    pub fn has_stop(&self, direction: Direction, stop: &str) -> bool {
        [DayType::Weekday, DayType::Holiday]
            .into_iter()
            .any(|day_type| self.stops_for(direction, day_type).iter().any(|s| s == stop))
    }
}
