//! Per-user stop preferences.
//!
//! Each user has a departure/arrival stop pair for each direction. The
//! query engine never sees user identity; handlers look the pair up here
//! and pass plain stop names on.
//!
//! Storage sits behind [`SettingsRepository`] so the bot does not depend
//! on a particular database. [`InMemorySettings`] is the bundled backend.

mod memory;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use crate::domain::Direction;

pub use memory::InMemorySettings;

/// Errors from a settings or notification store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No record exists for this user
    #[error("user {0} not found")]
    UserNotFound(String),

    /// The storage backend failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Where a user is in onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// Followed the bot but has not used it yet.
    Pending,
    Completed,
}

/// The four stops a user searches with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSettings {
    pub outbound_departure: String,
    pub outbound_arrival: String,
    pub inbound_departure: String,
    pub inbound_arrival: String,
}

impl StopSettings {
    /// Departure and arrival stop for `direction`.
    pub fn pair(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::Outbound => (&self.outbound_departure, &self.outbound_arrival),
            Direction::Inbound => (&self.inbound_departure, &self.inbound_arrival),
        }
    }

    /// The stop stored in `field`.
    pub fn get(&self, field: StopField) -> &str {
        match field {
            StopField::OutboundDeparture => &self.outbound_departure,
            StopField::OutboundArrival => &self.outbound_arrival,
            StopField::InboundDeparture => &self.inbound_departure,
            StopField::InboundArrival => &self.inbound_arrival,
        }
    }

    /// Replace the stop stored in `field`.
    pub fn set(&mut self, field: StopField, stop: impl Into<String>) {
        let slot = match field {
            StopField::OutboundDeparture => &mut self.outbound_departure,
            StopField::OutboundArrival => &mut self.outbound_arrival,
            StopField::InboundDeparture => &mut self.inbound_departure,
            StopField::InboundArrival => &mut self.inbound_arrival,
        };
        *slot = stop.into();
    }
}

impl Default for StopSettings {
    /// Station to company and back.
    fn default() -> Self {
        Self {
            outbound_departure: "西条駅".to_string(),
            outbound_arrival: "会社".to_string(),
            inbound_departure: "会社".to_string(),
            inbound_arrival: "西条駅".to_string(),
        }
    }
}

/// Error returned when parsing an unknown stop field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop field: {0:?}")]
pub struct InvalidStopField(pub String);

/// One of the four per-user stop slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopField {
    OutboundDeparture,
    OutboundArrival,
    InboundDeparture,
    InboundArrival,
}

impl StopField {
    pub const ALL: [StopField; 4] = [
        StopField::OutboundDeparture,
        StopField::OutboundArrival,
        StopField::InboundDeparture,
        StopField::InboundArrival,
    ];

    /// Wire name, e.g. "outbound_departure".
    pub fn as_str(&self) -> &'static str {
        match self {
            StopField::OutboundDeparture => "outbound_departure",
            StopField::OutboundArrival => "outbound_arrival",
            StopField::InboundDeparture => "inbound_departure",
            StopField::InboundArrival => "inbound_arrival",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            StopField::OutboundDeparture | StopField::OutboundArrival => Direction::Outbound,
            StopField::InboundDeparture | StopField::InboundArrival => Direction::Inbound,
        }
    }

    pub fn is_departure(&self) -> bool {
        matches!(
            self,
            StopField::OutboundDeparture | StopField::InboundDeparture
        )
    }

    /// User-facing name, e.g. 「行きの乗車バス停」.
    pub fn label(&self) -> &'static str {
        match self {
            StopField::OutboundDeparture => "行きの乗車バス停",
            StopField::OutboundArrival => "行きの降車バス停",
            StopField::InboundDeparture => "帰りの乗車バス停",
            StopField::InboundArrival => "帰りの降車バス停",
        }
    }
}

impl FromStr for StopField {
    type Err = InvalidStopField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StopField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| InvalidStopField(s.to_string()))
    }
}

impl fmt::Display for StopField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's stored settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: String,
    pub registration: RegistrationStatus,
    pub stops: StopSettings,
}

/// Storage for per-user settings.
pub trait SettingsRepository: Send + Sync {
    /// Fetch a user's settings, creating them with default stops if absent.
    ///
    /// `status` is only used when a new user is created.
    fn find_or_create(
        &self,
        user_id: &str,
        status: RegistrationStatus,
    ) -> impl Future<Output = Result<UserSettings, RepositoryError>> + Send;

    /// Fetch a user's settings.
    fn get(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserSettings>, RepositoryError>> + Send;

    /// Change one stop. Fails with [`RepositoryError::UserNotFound`] for
    /// unknown users.
    fn set_stop(
        &self,
        user_id: &str,
        field: StopField,
        stop: &str,
    ) -> impl Future<Output = Result<UserSettings, RepositoryError>> + Send;

    /// Change a user's registration status.
    fn set_registration(
        &self,
        user_id: &str,
        status: RegistrationStatus,
    ) -> impl Future<Output = Result<UserSettings, RepositoryError>> + Send;
}
