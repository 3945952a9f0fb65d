//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::bot::WebhookBody;
use crate::calendar;
use crate::domain::{ClockTime, Direction};
use crate::messaging::Messenger;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<M: Messenger + 'static>(state: AppState<M>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/webhook", post(webhook::<M>))
        .route("/api/trips/next", get(next_trips::<M>))
        .route("/api/trips/arrive-by", get(arrive_by::<M>))
        .route("/api/stops", get(stops::<M>))
        .route("/api/calendar/:date", get(calendar_day))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "no such endpoint".to_string(),
    }
}

/// Messaging platform webhook.
///
/// Events are handled before responding. Failures inside individual
/// events are logged and still answered with 200 so the platform does not
/// redeliver them.
async fn webhook<M: Messenger + 'static>(
    State(state): State<AppState<M>>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let body: WebhookBody = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid webhook body: {e}"),
    })?;

    let total = body.events.len();
    let failed = state.bot.handle_webhook(body).await;
    if failed > 0 {
        error!(total, failed, "some webhook events failed");
    } else {
        info!(total, "handled webhook");
    }

    Ok("OK")
}

fn parse_direction(s: &str) -> Result<Direction, AppError> {
    s.parse::<Direction>().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_time(field: &str, s: &str) -> Result<ClockTime, AppError> {
    ClockTime::parse_hhmm(s).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {field}: {e}"),
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
        message: format!("Invalid date: {s:?} (expected YYYY-MM-DD)"),
    })
}

/// Next departures between two stops.
async fn next_trips<M: Messenger + 'static>(
    State(state): State<AppState<M>>,
    Query(req): Query<NextTripsRequest>,
) -> Result<Json<TripsResponse>, AppError> {
    let direction = parse_direction(&req.direction)?;
    let now = state.engine.now();

    let reference = match (req.date.as_deref(), req.time.as_deref()) {
        (None, None) => now,
        (None, Some(time)) => now.date().and_time(parse_time("time", time)?.to_naive_time()),
        (Some(date), time) => {
            let date = parse_date(date)?;
            let time = match time {
                Some(t) => parse_time("time", t)?.to_naive_time(),
                None => NaiveTime::MIN,
            };
            NaiveDateTime::new(date, time)
        }
    };

    let trips = state.engine.find_next_trips(
        direction,
        &req.from,
        &req.to,
        trip_count(req.count),
        reference,
    );

    Ok(Json(TripsResponse {
        direction,
        from: req.from,
        to: req.to,
        date: reference.date(),
        day_type: calendar::day_type_for(reference.date()),
        trips,
    }))
}

/// Trips arriving by a deadline, latest arrival first.
async fn arrive_by<M: Messenger + 'static>(
    State(state): State<AppState<M>>,
    Query(req): Query<ArriveByRequest>,
) -> Result<Json<TripsResponse>, AppError> {
    let direction = parse_direction(&req.direction)?;
    let deadline = parse_time("deadline", &req.deadline)?;
    let date = match req.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => state.engine.now().date(),
    };

    let trips = state.engine.find_trips_arriving_by(
        direction,
        &req.from,
        &req.to,
        deadline,
        date,
        trip_count(req.count),
    );

    Ok(Json(TripsResponse {
        direction,
        from: req.from,
        to: req.to,
        date,
        day_type: calendar::day_type_for(date),
        trips,
    }))
}

/// Stops for a direction in route order.
async fn stops<M: Messenger + 'static>(
    State(state): State<AppState<M>>,
    Query(req): Query<StopsRequest>,
) -> Result<Json<StopsResponse>, AppError> {
    let direction = parse_direction(&req.direction)?;
    let stops = if req.all {
        state.engine.all_stops_union(direction)
    } else {
        state.engine.stops_today(direction).to_vec()
    };
    Ok(Json(StopsResponse { direction, stops }))
}

/// Whether a date runs the holiday timetable.
async fn calendar_day(Path(date): Path<String>) -> Result<Json<CalendarResponse>, AppError> {
    let date = parse_date(&date)?;
    let day_type = calendar::day_type_for(date);
    Ok(Json(CalendarResponse {
        date,
        is_holiday: day_type.is_holiday(),
        day_type,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, message = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
