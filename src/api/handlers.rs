//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::state::{AppState, ClockField, Status};
use super::responses::{ApiResponse, HealthResponse, SetFieldRequest, StatusResponse};

fn parse_field(name: &str) -> Result<ClockField, StatusCode> {
    ClockField::from_name(name).ok_or_else(|| {
        warn!("Unknown clock field: {}", name);
        StatusCode::NOT_FOUND
    })
}

/// Shared tail of the edit endpoints
fn edit_response(
    state: &AppState,
    field: ClockField,
    applied: bool,
) -> Result<Json<ApiResponse>, StatusCode> {
    if !applied {
        debug!("Rejected {} edit while running", field);
        return Err(StatusCode::CONFLICT);
    }

    let countdown = state.controller.snapshot();
    state.record_action(&format!("set-{}", field));
    Ok(Json(ApiResponse::applied(
        format!("{} set to {}", field, countdown.field(field)),
        countdown,
    )))
}

/// Handle POST /clock/:field - Set a clock field with wrap-around
pub async fn set_field_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let field = parse_field(&field)?;
    let applied = state.controller.set_field(field, request.value);
    edit_response(&state, field, applied)
}

/// Handle POST /clock/:field/up - Scroll a wheel up by one
pub async fn nudge_up_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let field = parse_field(&field)?;
    let applied = state.controller.nudge(field, 1);
    edit_response(&state, field, applied)
}

/// Handle POST /clock/:field/down - Scroll a wheel down by one
pub async fn nudge_down_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let field = parse_field(&field)?;
    let applied = state.controller.nudge(field, -1);
    edit_response(&state, field, applied)
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let countdown = state.controller.start();

    if countdown.is_running() {
        info!("Start endpoint called - countdown running from {}", countdown);
        state.record_action("start");
        Json(ApiResponse::applied("Countdown started".to_string(), countdown))
    } else {
        Json(ApiResponse::ignored(
            "Nothing to count down".to_string(),
            countdown,
        ))
    }
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let was_running = state.controller.is_running();
    let countdown = state.controller.pause();

    if was_running && countdown.status == Status::Paused {
        info!("Pause endpoint called - countdown paused at {}", countdown);
        state.record_action("pause");
        Json(ApiResponse::applied("Countdown paused".to_string(), countdown))
    } else {
        Json(ApiResponse::ignored(
            "Countdown is not running".to_string(),
            countdown,
        ))
    }
}

/// Handle POST /stop - Cancel the countdown and reset the clock
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let countdown = state.controller.stop();
    info!("Stop endpoint called - countdown reset");
    state.record_action("stop");
    Json(ApiResponse::applied("Countdown stopped".to_string(), countdown))
}

/// Handle GET /status - Return the current countdown status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let countdown = state.controller.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        countdown,
        display: countdown.display(),
        total_seconds: countdown.total_seconds(),
        is_running: countdown.is_running(),
        is_paused: countdown.is_paused(),
        is_finished: countdown.is_finished(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream every countdown snapshot as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Event stream subscriber connected");

    let stream = WatchStream::new(state.controller.subscribe())
        .map(|countdown| Event::default().event("state").json_data(countdown));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
