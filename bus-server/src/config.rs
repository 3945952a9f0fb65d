//! Runtime configuration.
//!
//! Read once at startup from environment variables. Every setting has a
//! default, so an empty environment yields a working local server (that
//! cannot reach the messaging API).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::bot::{DEFAULT_RESULT_COUNT, DEFAULT_TERMINAL_STOP};
use crate::messaging::LineConfig;
use crate::settings::StopSettings;

/// Error for an environment variable that is set but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server and bot settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Messaging API channel access token.
    pub channel_access_token: String,

    /// Messaging API base URL.
    pub api_base_url: Option<String>,

    /// Timetable file; the bundled timetable is used when unset.
    pub schedule_path: Option<PathBuf>,

    /// Seconds between reminder polling passes.
    pub reminder_interval_secs: u64,

    /// Buses listed per answer.
    pub result_count: usize,

    /// Fixed end of the route, left out of custom-search menus.
    pub terminal_stop: String,

    /// Stops given to new users.
    pub default_stops: StopSettings,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            channel_access_token: String::new(),
            api_base_url: None,
            schedule_path: None,
            reminder_interval_secs: 60,
            result_count: DEFAULT_RESULT_COUNT,
            terminal_stop: DEFAULT_TERMINAL_STOP.to_string(),
            default_stops: StopSettings::default(),
        }
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Recognised variables: `PORT`, `BIND_ADDR`, `LINE_CHANNEL_ACCESS_TOKEN`,
    /// `LINE_API_BASE_URL`, `SCHEDULE_PATH`, `REMINDER_INTERVAL_SECS` and
    /// `RESULT_COUNT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("BIND_ADDR") {
            config.bind_addr.set_ip(parse_var("BIND_ADDR", host)?);
        }
        if let Some(port) = get("PORT") {
            config.bind_addr.set_port(parse_var("PORT", port)?);
        }

        match get("LINE_CHANNEL_ACCESS_TOKEN") {
            Some(token) => config.channel_access_token = token,
            None => warn!("LINE_CHANNEL_ACCESS_TOKEN not set; replies will fail"),
        }
        config.api_base_url = get("LINE_API_BASE_URL");
        config.schedule_path = get("SCHEDULE_PATH").map(PathBuf::from);

        if let Some(secs) = get("REMINDER_INTERVAL_SECS") {
            let secs: u64 = parse_var("REMINDER_INTERVAL_SECS", secs)?;
            if secs == 0 {
                return Err(ConfigError {
                    var: "REMINDER_INTERVAL_SECS",
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.reminder_interval_secs = secs;
        }
        if let Some(count) = get("RESULT_COUNT") {
            config.result_count = parse_var("RESULT_COUNT", count)?;
        }

        Ok(config)
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_schedule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule_path = Some(path.into());
        self
    }

    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    /// Interval between reminder polling passes.
    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }

    /// Messaging client settings.
    pub fn line_config(&self) -> LineConfig {
        let config = LineConfig::new(&self.channel_access_token);
        match &self.api_base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }
}
