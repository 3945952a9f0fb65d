//! Application state for the web layer.

use std::sync::Arc;

use crate::bot::BotHandler;
use crate::messaging::LineClient;
use crate::notify::InMemoryNotifications;
use crate::query::QueryEngine;
use crate::settings::InMemorySettings;

/// The bot as wired into the server: in-memory stores, pluggable delivery.
pub type Bot<M> = BotHandler<InMemorySettings, InMemoryNotifications, M>;

/// Shared application state.
pub struct AppState<M = LineClient> {
    /// Timetable queries for the JSON API
    pub engine: QueryEngine,

    /// Webhook event handler
    pub bot: Arc<Bot<M>>,
}

impl<M> AppState<M> {
    pub fn new(engine: QueryEngine, bot: Bot<M>) -> Self {
        Self {
            engine,
            bot: Arc::new(bot),
        }
    }
}

// Not derived, which would require `M: Clone`
impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            bot: Arc::clone(&self.bot),
        }
    }
}
