//! Commuter bus timetable bot.
//!
//! A chat bot and JSON API for one fixed bus route between a railway
//! station and a company site. It answers "when is the next bus?",
//! "which bus gets me there by 9?" and sends one-shot reminders.

pub mod bot;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod intent;
pub mod messaging;
pub mod notify;
pub mod query;
pub mod settings;
pub mod timetable;
pub mod web;
