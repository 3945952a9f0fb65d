use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_server::bot::BotHandler;
use bus_server::config::BotConfig;
use bus_server::messaging::LineClient;
use bus_server::notify::{InMemoryNotifications, ReminderScheduler};
use bus_server::query::{QueryEngine, SystemClock};
use bus_server::settings::InMemorySettings;
use bus_server::timetable::Timetable;
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let timetable = match &config.schedule_path {
        Some(path) => Timetable::load(path),
        None => Timetable::embedded(),
    };
    let timetable = match timetable {
        Ok(timetable) => timetable,
        Err(e) => {
            error!(error = %e, "failed to load timetable");
            return ExitCode::FAILURE;
        }
    };
    let source = match &config.schedule_path {
        Some(path) => path.display().to_string(),
        None => "embedded".to_string(),
    };
    info!(%source, trips = timetable.trip_count(), "loaded timetable");

    let line = match LineClient::new(config.line_config()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create messaging client");
            return ExitCode::FAILURE;
        }
    };

    let engine = QueryEngine::new(Arc::new(timetable));
    let settings = InMemorySettings::new(config.default_stops.clone());
    let notifications = InMemoryNotifications::new();

    // Reminders go out every interval; the first pass runs immediately
    let reminders = ReminderScheduler::new(
        notifications.clone(),
        line.clone(),
        Arc::new(SystemClock),
    )
    .spawn(config.reminder_interval());

    let bot = BotHandler::new(engine.clone(), settings, notifications, line)
        .with_result_count(config.result_count)
        .with_terminal_stop(config.terminal_stop.clone());

    let app = create_router(AppState::new(engine, bot));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.bind_addr, "bus bot listening");

    let result = axum::serve(listener, app).await;
    reminders.abort();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
