//! Event dispatch.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::events::{EventMessage, WebhookBody, WebhookEvent};
use super::postback::PostbackAction;
use super::replies;
use crate::domain::{ClockTime, Direction};
use crate::intent::{Intent, parse_intent};
use crate::messaging::{Message, MessagingError, Messenger};
use crate::notify::NotificationRepository;
use crate::query::QueryEngine;
use crate::settings::{RegistrationStatus, RepositoryError, SettingsRepository, StopSettings};

/// Buses listed per answer unless configured otherwise.
pub const DEFAULT_RESULT_COUNT: usize = 2;

/// The fixed end of the route.
pub const DEFAULT_TERMINAL_STOP: &str = "会社";

/// Errors while handling one event.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to send reply: {0}")]
    Messaging(#[from] MessagingError),
}

/// How an arrive-by answer is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArriveByStyle {
    /// Same-day text query: time only.
    Today,
    /// Picker query with the user's stops: date and time.
    Dated,
    /// Picker query between explicit stops: also names the arrival stop
    /// when nothing is found.
    DatedToStop,
}

/// Answers webhook events.
///
/// Storage and delivery are injected so the same logic runs against the
/// in-memory stores, a database, or a recording messenger.
pub struct BotHandler<S, N, M> {
    engine: QueryEngine,
    settings: S,
    notifications: N,
    messenger: M,
    result_count: usize,
    terminal_stop: String,
}

impl<S, N, M> BotHandler<S, N, M>
where
    S: SettingsRepository,
    N: NotificationRepository,
    M: Messenger,
{
    pub fn new(engine: QueryEngine, settings: S, notifications: N, messenger: M) -> Self {
        Self {
            engine,
            settings,
            notifications,
            messenger,
            result_count: DEFAULT_RESULT_COUNT,
            terminal_stop: DEFAULT_TERMINAL_STOP.to_string(),
        }
    }

    /// Set how many buses each answer lists.
    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    /// Set the stop excluded from custom-search menus.
    pub fn with_terminal_stop(mut self, stop: impl Into<String>) -> Self {
        self.terminal_stop = stop.into();
        self
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    /// Handle every event in a webhook body concurrently.
    ///
    /// A failing event is logged and does not affect the others. Returns
    /// the number of events that failed.
    pub async fn handle_webhook(&self, body: WebhookBody) -> usize {
        let results = join_all(body.events.into_iter().map(|event| async move {
            let kind = event.kind();
            let result = self.handle_event(event).await;
            if let Err(e) = &result {
                warn!(kind, error = %e, "failed to handle event");
            }
            result
        }))
        .await;

        results.iter().filter(|r| r.is_err()).count()
    }

    /// Handle one event, replying through the messenger.
    pub async fn handle_event(&self, event: WebhookEvent) -> Result<(), BotError> {
        let Some(user_id) = event.user_id().map(str::to_string) else {
            debug!(kind = event.kind(), "ignoring event without a user");
            return Ok(());
        };

        let (reply_token, messages) = match event {
            WebhookEvent::Follow(e) => (e.reply_token, self.respond_to_follow(&user_id).await?),
            WebhookEvent::Message(e) => match e.message {
                EventMessage::Text { text } => {
                    (e.reply_token, self.respond_to_text(&user_id, &text).await?)
                }
                EventMessage::Other => {
                    debug!(user_id = %user_id, "ignoring non-text message");
                    return Ok(());
                }
            },
            WebhookEvent::Postback(e) => {
                let datetime = e.postback.params.and_then(|p| p.datetime);
                let messages = self
                    .respond_to_postback(&user_id, &e.postback.data, datetime.as_deref())
                    .await?;
                (e.reply_token, messages)
            }
            WebhookEvent::Other => {
                info!("unhandled event type");
                return Ok(());
            }
        };

        if messages.is_empty() {
            return Ok(());
        }
        self.messenger.reply(&reply_token, messages).await?;
        Ok(())
    }

    /// Register a new follower.
    pub async fn respond_to_follow(&self, user_id: &str) -> Result<Vec<Message>, BotError> {
        self.settings
            .find_or_create(user_id, RegistrationStatus::Pending)
            .await?;
        info!(user_id, "new follower");
        Ok(vec![replies::welcome(), replies::menu_hint()])
    }

    /// Answer a text message.
    pub async fn respond_to_text(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<Vec<Message>, BotError> {
        let user = self
            .settings
            .find_or_create(user_id, RegistrationStatus::Pending)
            .await?;
        let intent = parse_intent(text);
        debug!(user_id, ?intent, "parsed text message");

        let now = self.engine.now();

        let messages = match intent {
            Intent::SearchOutbound => vec![self.next_buses(&user.stops, Direction::Outbound, now)],
            Intent::SearchInbound => vec![self.next_buses(&user.stops, Direction::Inbound, now)],
            Intent::ArriveBy { time, direction } => {
                let (departure, arrival) = user.stops.pair(direction);
                self.arrive_by(
                    direction,
                    departure,
                    arrival,
                    time,
                    now.date(),
                    ArriveByStyle::Today,
                )
            }
            Intent::DepartAt { time, direction } => {
                let reference = now.date().and_time(time.to_naive_time());
                vec![self.next_buses(&user.stops, direction, reference)]
            }
            Intent::Settings => vec![replies::settings_menu()],
            Intent::Notification { time } => {
                let mut notify_at = now.date().and_time(time.to_naive_time());
                if notify_at <= now {
                    notify_at += Duration::days(1);
                }
                self.notifications
                    .create(user_id, Direction::Outbound, notify_at)
                    .await?;
                info!(user_id, %notify_at, "reminder set from text");
                vec![replies::notification_set(notify_at)]
            }
            Intent::Help => vec![replies::help()],
            Intent::Unknown => vec![replies::main_menu()],
        };

        Ok(messages)
    }

    /// Answer a button press. Unknown or malformed data gets no reply.
    pub async fn respond_to_postback(
        &self,
        user_id: &str,
        data: &str,
        datetime: Option<&str>,
    ) -> Result<Vec<Message>, BotError> {
        let action: PostbackAction = match data.parse() {
            Ok(action) => action,
            Err(e) => {
                warn!(user_id, data, error = %e, "ignoring postback");
                return Ok(Vec::new());
            }
        };
        debug!(user_id, action = action.name(), "postback");

        let mut user = self
            .settings
            .find_or_create(user_id, RegistrationStatus::Completed)
            .await?;
        // Pressing any menu button finishes onboarding
        if user.registration == RegistrationStatus::Pending {
            user = self
                .settings
                .set_registration(user_id, RegistrationStatus::Completed)
                .await?;
            info!(user_id, "registration completed");
        }
        let picked = datetime.and_then(parse_picker_datetime);
        let now = self.engine.now();

        let messages = match action {
            PostbackAction::Search { direction } => {
                vec![self.next_buses(&user.stops, direction, now)]
            }
            PostbackAction::Settings => vec![replies::settings_menu()],
            PostbackAction::ShowSettings => vec![replies::current_settings(&user.stops)],
            PostbackAction::ChangeStop { field } => {
                let stops = self.engine.stops_today(field.direction());
                vec![replies::stop_select(field, stops)]
            }
            PostbackAction::SetStop { field, stop } => {
                if !self.engine.timetable().has_stop(field.direction(), &stop) {
                    warn!(
                        user_id,
                        %field,
                        stop = %stop,
                        "storing stop missing from the timetable"
                    );
                }
                self.settings.set_stop(user_id, field, &stop).await?;
                info!(user_id, %field, stop = %stop, "stop changed");
                vec![replies::stop_changed(field, &stop)]
            }
            PostbackAction::TimeSearchMenu => vec![replies::time_search_menu()],
            PostbackAction::ArriveBy { direction } => match picked {
                None => vec![replies::choose_datetime()],
                Some(at) => {
                    let (departure, arrival) = user.stops.pair(direction);
                    self.arrive_by(
                        direction,
                        departure,
                        arrival,
                        ClockTime::from(at),
                        at.date(),
                        ArriveByStyle::Dated,
                    )
                }
            },
            PostbackAction::SetNotification { direction } => match picked {
                None => vec![replies::choose_datetime()],
                Some(at) if at <= now => vec![replies::past_datetime()],
                Some(at) => {
                    self.notifications.create(user_id, direction, at).await?;
                    info!(user_id, notify_at = %at, "reminder set from picker");
                    vec![replies::reminder_set(at)]
                }
            },
            PostbackAction::ListNotifications => {
                let pending = self.notifications.pending_for(user_id).await?;
                vec![replies::notification_list(&pending)]
            }
            PostbackAction::DeleteNotification { id } => {
                // Only the owner may cancel a reminder
                let owned = self
                    .notifications
                    .pending_for(user_id)
                    .await?
                    .iter()
                    .any(|n| n.id == id);
                if owned && self.notifications.cancel(id).await? {
                    vec![replies::notification_deleted()]
                } else {
                    vec![replies::notification_not_found()]
                }
            }
            PostbackAction::DeleteAllNotifications => {
                let cancelled = self.notifications.cancel_all(user_id).await?;
                info!(user_id, cancelled, "cancelled all reminders");
                vec![replies::all_notifications_deleted()]
            }
            PostbackAction::CustomSearchMenu => vec![replies::custom_search_menu()],
            PostbackAction::CustomOutboundDeparture => {
                let stops = self.stops_without_terminal(Direction::Outbound);
                vec![replies::custom_departure_select(&stops, &self.terminal_stop)]
            }
            PostbackAction::CustomInboundArrival => {
                let stops = self.stops_without_terminal(Direction::Inbound);
                vec![replies::custom_arrival_select(&stops, &self.terminal_stop)]
            }
            PostbackAction::CustomArriveBy {
                direction,
                departure,
                arrival,
            } => match picked {
                None => vec![replies::choose_datetime()],
                Some(at) => self.arrive_by(
                    direction,
                    &departure,
                    &arrival,
                    ClockTime::from(at),
                    at.date(),
                    ArriveByStyle::DatedToStop,
                ),
            },
            PostbackAction::Help => vec![replies::help()],
        };

        Ok(messages)
    }

    fn next_buses(&self, stops: &StopSettings, direction: Direction, after: NaiveDateTime) -> Message {
        let (departure, arrival) = stops.pair(direction);
        let trips =
            self.engine
                .find_next_trips(direction, departure, arrival, self.result_count, after);
        replies::schedule(direction, departure, arrival, &trips)
    }

    fn arrive_by(
        &self,
        direction: Direction,
        departure: &str,
        arrival: &str,
        deadline: ClockTime,
        date: NaiveDate,
        style: ArriveByStyle,
    ) -> Vec<Message> {
        let trips = self.engine.find_trips_arriving_by(
            direction,
            departure,
            arrival,
            deadline,
            date,
            self.result_count,
        );
        let shown_date = (style != ArriveByStyle::Today).then_some(date);

        if trips.is_empty() {
            let named_arrival = (style == ArriveByStyle::DatedToStop).then_some(arrival);
            return vec![replies::arrive_by_none(shown_date, deadline, named_arrival)];
        }

        vec![
            replies::arrive_by_header(shown_date, deadline),
            replies::schedule(direction, departure, arrival, &trips),
        ]
    }

    fn stops_without_terminal(&self, direction: Direction) -> Vec<String> {
        self.engine
            .stops_today(direction)
            .iter()
            .filter(|stop| **stop != self.terminal_stop)
            .cloned()
            .collect()
    }
}

/// Parse a picker value such as "2026-10-20T09:00".
pub fn parse_picker_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
