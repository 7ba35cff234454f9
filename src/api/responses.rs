//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    display::{format_hms, Labels},
    state::{CountdownState, PickerField, PickerRow, PickerState, SelectionPickers, TimeSelection, TimerPhase},
};

/// Body of POST /picker/:field/settle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Index of the top visible row when the gesture stopped
    pub first_visible: usize,
}

/// Body of POST /picker/:field/select
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    pub value: u32,
}

/// One picker column of the configuration screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerColumn {
    pub field: PickerField,
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub value: u32,
    pub top_index: usize,
    pub rows: Vec<PickerRow>,
}

impl From<&PickerState> for PickerColumn {
    fn from(picker: &PickerState) -> Self {
        let (min, max) = picker.bounds();
        Self {
            field: picker.field(),
            label: picker.label().to_string(),
            min,
            max,
            value: picker.value(),
            top_index: picker.top_index(),
            rows: picker.window(),
        }
    }
}

/// What the configuration screen shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationView {
    pub title: String,
    pub columns: Vec<PickerColumn>,
    pub selection: TimeSelection,
    pub run_label: String,
    pub timestamp: DateTime<Utc>,
}

impl ConfigurationView {
    pub fn new(pickers: &SelectionPickers, labels: &Labels) -> Self {
        Self {
            title: labels.app_title.clone(),
            columns: vec![
                PickerColumn::from(&pickers.hours),
                PickerColumn::from(&pickers.minutes),
                PickerColumn::from(&pickers.seconds),
            ],
            selection: pickers.selection(),
            run_label: labels.run.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// What the timer screen shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub title: String,
    pub phase: TimerPhase,
    /// HH:MM:SS readout
    pub display: String,
    pub remaining_hours: u32,
    pub remaining_minutes: u32,
    pub remaining_seconds: u32,
    pub elapsed_seconds: u64,
    pub total_seconds: u64,
    pub progress: f64,
    /// "Total time 0H 1M 30S"
    pub caption: String,
    pub toggle_label: String,
    pub stop_label: String,
    pub timestamp: DateTime<Utc>,
}

impl TimerView {
    pub fn new(state: &CountdownState, labels: &Labels) -> Self {
        Self {
            title: labels.timer_title.clone(),
            phase: state.phase,
            display: format_hms(state.remaining_hours, state.remaining_minutes, state.remaining_seconds),
            remaining_hours: state.remaining_hours,
            remaining_minutes: state.remaining_minutes,
            remaining_seconds: state.remaining_seconds,
            elapsed_seconds: state.elapsed_seconds,
            total_seconds: state.total_seconds,
            progress: state.progress,
            caption: labels.total_caption(&state.selection),
            toggle_label: labels.toggle_label(state.phase).to_string(),
            stop_label: labels.stop.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Response to POST /timer/stop: the final timer view plus the configuration screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub timer: TimerView,
    pub configuration: ConfigurationView,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Server status with a summary of the current timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer_phase: Option<TimerPhase>,
    pub timer_display: Option<String>,
    pub selection: TimeSelection,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_view_renders_readout_and_caption() {
        let mut state = CountdownState::start(TimeSelection::new(0, 1, 0)).unwrap();
        state.tick();
        let view = TimerView::new(&state, &Labels::default());
        assert_eq!(view.display, "00:00:59");
        assert_eq!(view.caption, "Total time 0H 1M 0S");
        assert_eq!(view.toggle_label, "Pause");
        assert_eq!(view.title, "Timing…");
    }

    #[test]
    fn configuration_view_has_three_columns() {
        let view = ConfigurationView::new(&SelectionPickers::default(), &Labels::default());
        let labels: Vec<&str> = view.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["H", "M", "S"]);
        assert_eq!(view.columns[0].max, 23);
        assert_eq!(view.columns[1].max, 59);
        assert_eq!(view.selection, TimeSelection::new(3, 3, 3));
    }
}
