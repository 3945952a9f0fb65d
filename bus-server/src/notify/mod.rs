//! One-shot reminders.
//!
//! A reminder is a pending notification with a local date-time. The
//! [`ReminderScheduler`] polls for due reminders and pushes a fixed text
//! to each user; delivered reminders are marked sent and never fire
//! again.

mod memory;
mod scheduler;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::domain::Direction;
use crate::settings::RepositoryError;

pub use memory::InMemoryNotifications;
pub use scheduler::{REMINDER_TEXT, ReminderRun, ReminderScheduler};

/// Identifier of a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotificationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(NotificationId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Pending,
    Sent,
    Cancelled,
}

/// A scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: String,
    pub direction: Direction,
    /// Local date-time the reminder fires at.
    pub notify_at: NaiveDateTime,
    pub one_time: bool,
    pub status: NotificationStatus,
}

impl Notification {
    pub fn is_pending(&self) -> bool {
        self.status == NotificationStatus::Pending
    }

    /// Whether this reminder should fire at `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.is_pending() && self.notify_at <= now
    }
}

/// Storage for reminders.
pub trait NotificationRepository: Send + Sync {
    /// Store a new pending one-shot reminder.
    fn create(
        &self,
        user_id: &str,
        direction: Direction,
        notify_at: NaiveDateTime,
    ) -> impl Future<Output = Result<Notification, RepositoryError>> + Send;

    /// A user's pending reminders, earliest first.
    fn pending_for(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Notification>, RepositoryError>> + Send;

    /// Cancel one reminder. Returns whether a pending reminder was cancelled.
    fn cancel(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Cancel all of a user's pending reminders, returning how many.
    fn cancel_all(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<usize, RepositoryError>> + Send;

    /// Pending reminders whose time is at or before `now`, earliest first.
    fn due(
        &self,
        now: NaiveDateTime,
    ) -> impl Future<Output = Result<Vec<Notification>, RepositoryError>> + Send;

    /// Record that a reminder was delivered.
    fn mark_sent(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
