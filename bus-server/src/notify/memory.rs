//! In-process reminder store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use super::{Notification, NotificationId, NotificationRepository, NotificationStatus};
use crate::domain::Direction;
use crate::settings::RepositoryError;

/// Reminders kept in memory for the life of the process.
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifications {
    notifications: Arc<RwLock<BTreeMap<NotificationId, Notification>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a reminder in any status.
    pub async fn get(&self, id: NotificationId) -> Option<Notification> {
        self.notifications.read().await.get(&id).cloned()
    }

    async fn collect_sorted(&self, keep: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| keep(n))
            .cloned()
            .collect();
        found.sort_by_key(|n| (n.notify_at, n.id));
        found
    }
}

impl NotificationRepository for InMemoryNotifications {
    async fn create(
        &self,
        user_id: &str,
        direction: Direction,
        notify_at: NaiveDateTime,
    ) -> Result<Notification, RepositoryError> {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let notification = Notification {
            id,
            user_id: user_id.to_string(),
            direction,
            notify_at,
            one_time: true,
            status: NotificationStatus::Pending,
        };
        self.notifications
            .write()
            .await
            .insert(id, notification.clone());
        Ok(notification)
    }

    async fn pending_for(&self, user_id: &str) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self
            .collect_sorted(|n| n.is_pending() && n.user_id == user_id)
            .await)
    }

    async fn cancel(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&id) {
            Some(n) if n.is_pending() => {
                n.status = NotificationStatus::Cancelled;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cancel_all(&self, user_id: &str) -> Result<usize, RepositoryError> {
        let mut notifications = self.notifications.write().await;
        let mut cancelled = 0;
        for n in notifications
            .values_mut()
            .filter(|n| n.is_pending() && n.user_id == user_id)
        {
            n.status = NotificationStatus::Cancelled;
            cancelled += 1;
        }
        Ok(cancelled)
    }

    async fn due(&self, now: NaiveDateTime) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self.collect_sorted(|n| n.is_due(now)).await)
    }

    async fn mark_sent(&self, id: NotificationId) -> Result<(), RepositoryError> {
        if let Some(n) = self.notifications.write().await.get_mut(&id) {
            n.status = NotificationStatus::Sent;
        }
        Ok(())
    }
}
