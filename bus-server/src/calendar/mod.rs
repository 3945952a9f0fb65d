//! Service-day classification.
//!
//! The bus runs a weekday timetable Monday to Friday and a holiday
//! timetable on weekends and Japanese public holidays. Public holidays come
//! from a compiled-in list covering a fixed range of years; dates outside
//! that range are classified by weekday alone.

mod holidays;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::DayType;

use holidays::JAPANESE_HOLIDAYS;

/// Whether `date` runs the holiday timetable.
///
/// True on Saturdays, Sundays, and any date in the public holiday list.
///
/// # Examples
///
/// ```
/// use bus_server::calendar::is_service_holiday;
/// use chrono::NaiveDate;
///
/// // Saturday
/// assert!(is_service_holiday(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()));
/// // Sports Day (Monday)
/// assert!(is_service_holiday(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()));
/// // Ordinary Monday
/// assert!(!is_service_holiday(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
/// ```
pub fn is_service_holiday(date: NaiveDate) -> bool {
    is_weekend(date) || is_public_holiday(date)
}

/// The timetable day-type that applies on `date`.
pub fn day_type_for(date: NaiveDate) -> DayType {
    DayType::from_holiday(is_service_holiday(date))
}

/// Whether `date` falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` is in the public holiday list.
pub fn is_public_holiday(date: NaiveDate) -> bool {
    let key = date.format("%Y-%m-%d").to_string();
    JAPANESE_HOLIDAYS.binary_search(&key.as_str()).is_ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn any_date()(days in 0i64..(365 * 8000)) -> NaiveDate {
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + chrono::Duration::days(days)
        }
    }

    proptest! {
        #[test]
        fn weekend_always_holiday(date in any_date()) {
            if is_weekend(date) {
                prop_assert!(is_service_holiday(date));
            }
        }

        #[test]
        fn classification_is_deterministic(date in any_date()) {
            prop_assert_eq!(is_service_holiday(date), is_service_holiday(date));
        }

        #[test]
        fn unlisted_weekdays_are_weekday_service(date in any_date()) {
            if !is_weekend(date) && !is_public_holiday(date) {
                prop_assert_eq!(day_type_for(date), DayType::Weekday);
            }
        }
    }
}
