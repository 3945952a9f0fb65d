//! Background delivery of due reminders.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::NotificationRepository;
use crate::messaging::{Message, Messenger};
use crate::query::Clock;
use crate::settings::RepositoryError;

/// Text pushed when a reminder fires.
pub const REMINDER_TEXT: &str = "⏰ 通知時間になりました！";

/// Outcome of one polling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderRun {
    pub sent: usize,
    pub failed: usize,
}

/// Polls the notification store and pushes due reminders.
pub struct ReminderScheduler<N, M> {
    notifications: N,
    messenger: M,
    clock: Arc<dyn Clock>,
}

impl<N, M> ReminderScheduler<N, M>
where
    N: NotificationRepository + 'static,
    M: Messenger + 'static,
{
    pub fn new(notifications: N, messenger: M, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            messenger,
            clock,
        }
    }

    /// Deliver every reminder due at `now`.
    ///
    /// A failed push is logged and the reminder stays pending, so the next
    /// pass retries it.
    pub async fn run_once(&self, now: NaiveDateTime) -> Result<ReminderRun, RepositoryError> {
        let due = self.notifications.due(now).await?;
        let mut run = ReminderRun::default();

        for notification in due {
            let pushed = self
                .messenger
                .push(&notification.user_id, vec![Message::text(REMINDER_TEXT)])
                .await;

            match pushed {
                Ok(()) => {
                    self.notifications.mark_sent(notification.id).await?;
                    run.sent += 1;
                }
                Err(e) => {
                    warn!(
                        id = %notification.id,
                        user_id = %notification.user_id,
                        error = %e,
                        "failed to push reminder"
                    );
                    run.failed += 1;
                }
            }
        }

        Ok(run)
    }

    /// Run [`Self::run_once`] on a fixed interval until the task is aborted.
    pub fn spawn(self, every: Duration) -> JoinHandle<()> {
        info!(interval_secs = every.as_secs(), "reminder scheduler started");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match self.run_once(self.clock.now()).await {
                    Ok(run) if run.sent > 0 || run.failed > 0 => {
                        info!(sent = run.sent, failed = run.failed, "processed reminders");
                    }
                    Ok(_) => debug!("no reminders due"),
                    Err(e) => warn!(error = %e, "failed to load due reminders"),
                }
            }
        })
    }
}
