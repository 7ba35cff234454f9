//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::info;

use crate::{
    display::format_hms,
    error::TimerError,
    state::{AppState, PickerField, TimeSelection},
    tasks::Control,
};
use super::responses::{
    ConfigurationView, HealthResponse, SelectRequest, SettleRequest, StatusResponse, StopResponse,
    TimerView,
};

/// Handle GET /picker - Show the configuration screen
pub async fn picker_handler(State(state): State<Arc<AppState>>) -> Result<Json<ConfigurationView>, TimerError> {
    let pickers = state.get_pickers()?;
    Ok(Json(ConfigurationView::new(&pickers, &state.labels)))
}

/// Handle POST /picker/:field/settle - Commit the value under the center row
pub async fn settle_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    request: Result<Json<SettleRequest>, JsonRejection>,
) -> Result<Json<ConfigurationView>, TimerError> {
    let Json(request) = request.map_err(invalid_body)?;
    let field: PickerField = field.parse()?;
    let pickers = state.settle_picker(field, request.first_visible)?;
    Ok(Json(ConfigurationView::new(&pickers, &state.labels)))
}

/// Handle POST /picker/:field/select - Center a value directly
pub async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    request: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<ConfigurationView>, TimerError> {
    let Json(request) = request.map_err(invalid_body)?;
    let field: PickerField = field.parse()?;
    let pickers = state.select_picker_value(field, request.value)?;
    Ok(Json(ConfigurationView::new(&pickers, &state.labels)))
}

/// Handle POST /timer/start - Start a countdown from the body or the pickers
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TimerView>, TimerError> {
    let selection = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let selection: TimeSelection = serde_json::from_slice(&body)
            .map_err(|e| TimerError::InvalidRequest(e.to_string()))?;
        Some(selection)
    };

    let countdown = state.start_timer(selection).await?;
    info!("Start endpoint called - counting down {}s", countdown.total_seconds);
    Ok(Json(TimerView::new(&countdown, &state.labels)))
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, TimerError> {
    control(&state, Control::Pause).await
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, TimerError> {
    control(&state, Control::Resume).await
}

/// Handle POST /timer/toggle - The combined play/pause button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, TimerError> {
    control(&state, Control::Toggle).await
}

/// Handle POST /timer/stop - Stop the countdown and go back to the pickers
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>, TimerError> {
    let countdown = state.control_timer(Control::Stop).await?;
    let pickers = state.get_pickers()?;
    info!("Stop endpoint called - returning to configuration");
    Ok(Json(StopResponse {
        timer: TimerView::new(&countdown, &state.labels),
        configuration: ConfigurationView::new(&pickers, &state.labels),
    }))
}

/// Handle GET /timer - Show the timer screen
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, TimerError> {
    let countdown = state.get_timer_state().ok_or(TimerError::NoActiveTimer)?;
    Ok(Json(TimerView::new(&countdown, &state.labels)))
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, TimerError> {
    let selection = state.get_pickers()?.selection();
    let countdown = state.get_timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer_phase: countdown.as_ref().map(|c| c.phase),
        timer_display: countdown
            .as_ref()
            .map(|c| format_hms(c.remaining_hours, c.remaining_minutes, c.remaining_seconds)),
        selection,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn control(state: &AppState, control: Control) -> Result<Json<TimerView>, TimerError> {
    let countdown = state.control_timer(control).await?;
    Ok(Json(TimerView::new(&countdown, &state.labels)))
}

fn invalid_body(rejection: JsonRejection) -> TimerError {
    TimerError::InvalidRequest(rejection.body_text())
}
