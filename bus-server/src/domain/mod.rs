//! Domain types for the bus timetable bot.
//!
//! These types enforce their invariants at construction time, so code
//! that receives them can trust their validity.

mod direction;
mod time;

pub use direction::{DayType, Direction, InvalidDirection};
pub use time::{ClockTime, TimeError};
