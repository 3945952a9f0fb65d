//! Outbound messaging.
//!
//! The bot talks to users through [`Messenger`]: `reply` answers an
//! incoming event using its one-shot reply token, `push` sends
//! unprompted (reminders). [`LineClient`] is the production
//! implementation; [`RecordingMessenger`] records sends for tests.

mod client;
mod error;
mod message;
mod mock;

use std::future::Future;

pub use client::{LineClient, LineConfig};
pub use error::MessagingError;
pub use message::{Action, MAX_LABEL_CHARS, MAX_QUICK_REPLY_ITEMS, Message, QuickReply, QuickReplyItem};
pub use mock::{RecordingMessenger, Sent};

/// Delivers messages to users.
pub trait Messenger: Send + Sync {
    /// Answer an event. Reply tokens are single-use.
    fn reply(
        &self,
        reply_token: &str,
        messages: Vec<Message>,
    ) -> impl Future<Output = Result<(), MessagingError>> + Send;

    /// Send to a user without a triggering event.
    fn push(
        &self,
        user_id: &str,
        messages: Vec<Message>,
    ) -> impl Future<Output = Result<(), MessagingError>> + Send;
}
