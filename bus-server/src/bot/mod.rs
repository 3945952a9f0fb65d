//! Chat bot front end.
//!
//! Turns webhook events (follows, text messages, button presses) into
//! timetable queries, settings changes and reminders, and answers
//! through a [`Messenger`](crate::messaging::Messenger).

mod events;
mod handler;
mod postback;
pub mod replies;

pub use events::{
    EventMessage, EventSource, FollowEvent, MessageEvent, PostbackContent, PostbackEvent,
    PostbackParams, WebhookBody, WebhookEvent,
};
pub use handler::{
    BotError, BotHandler, DEFAULT_RESULT_COUNT, DEFAULT_TERMINAL_STOP, parse_picker_datetime,
};
pub use postback::{PostbackAction, PostbackError};
