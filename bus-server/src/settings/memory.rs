//! In-process settings store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::{
    RegistrationStatus, RepositoryError, SettingsRepository, StopField, StopSettings,
    UserSettings,
};

/// Settings kept in memory for the life of the process.
///
/// Cheap to clone; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettings {
    users: Arc<RwLock<HashMap<String, UserSettings>>>,
    defaults: StopSettings,
}

impl InMemorySettings {
    /// Create an empty store whose new users get `defaults`.
    pub fn new(defaults: StopSettings) -> Self {
        Self {
            users: Arc::default(),
            defaults,
        }
    }
}

impl SettingsRepository for InMemorySettings {
    async fn find_or_create(
        &self,
        user_id: &str,
        status: RegistrationStatus,
    ) -> Result<UserSettings, RepositoryError> {
        if let Some(existing) = self.users.read().await.get(user_id) {
            return Ok(existing.clone());
        }

        let mut users = self.users.write().await;
        let settings = users.entry(user_id.to_string()).or_insert_with(|| {
            info!(user_id, "creating user with default stops");
            UserSettings {
                user_id: user_id.to_string(),
                registration: status,
                stops: self.defaults.clone(),
            }
        });
        Ok(settings.clone())
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserSettings>, RepositoryError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn set_stop(
        &self,
        user_id: &str,
        field: StopField,
        stop: &str,
    ) -> Result<UserSettings, RepositoryError> {
        let mut users = self.users.write().await;
        let settings = users
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.to_string()))?;
        settings.stops.set(field, stop);
        Ok(settings.clone())
    }

    async fn set_registration(
        &self,
        user_id: &str,
        status: RegistrationStatus,
    ) -> Result<UserSettings, RepositoryError> {
        let mut users = self.users.write().await;
        let settings = users
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.to_string()))?;
        settings.registration = status;
        Ok(settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    #[tokio::test]
    async fn find_or_create_uses_defaults() {
        let repo = InMemorySettings::new(StopSettings::default());

        let user = repo
            .find_or_create("U1", RegistrationStatus::Pending)
            .await
            .unwrap();
        assert_eq!(user.user_id, "U1");
        assert_eq!(user.registration, RegistrationStatus::Pending);
        assert_eq!(user.stops, StopSettings::default());
        assert_eq!(repo.get("U1").await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn find_or_create_keeps_existing() {
        let repo = InMemorySettings::new(StopSettings::default());
        repo.find_or_create("U1", RegistrationStatus::Pending)
            .await
            .unwrap();
        repo.set_stop("U1", StopField::OutboundDeparture, "江熊")
            .await
            .unwrap();

        let again = repo
            .find_or_create("U1", RegistrationStatus::Completed)
            .await
            .unwrap();
        assert_eq!(again.registration, RegistrationStatus::Pending);
        assert_eq!(again.stops.pair(Direction::Outbound), ("江熊", "会社"));
    }

    #[tokio::test]
    async fn get_missing_user() {
        let repo = InMemorySettings::default();
        assert_eq!(repo.get("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_stop_on_missing_user_fails() {
        let repo = InMemorySettings::default();
        let err = repo
            .set_stop("nobody", StopField::InboundArrival, "江熊")
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::UserNotFound("nobody".into()));
    }

    #[tokio::test]
    async fn set_registration_updates_status() {
        let repo = InMemorySettings::default();
        repo.find_or_create("U1", RegistrationStatus::Pending)
            .await
            .unwrap();
        let user = repo
            .set_registration("U1", RegistrationStatus::Completed)
            .await
            .unwrap();
        assert_eq!(user.registration, RegistrationStatus::Completed);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemorySettings::default();
        let clone = repo.clone();
        repo.find_or_create("U1", RegistrationStatus::Pending)
            .await
            .unwrap();
        assert!(clone.get("U1").await.unwrap().is_some());
    }
}
