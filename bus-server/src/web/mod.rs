//! Web layer for the bus timetable bot.
//!
//! Serves the messaging webhook, a health check, and a small JSON API over
//! the timetable.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Bot};
