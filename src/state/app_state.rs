//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{CountdownState, PickerField, SelectionPickers, TimeSelection};
use crate::{
    display::Labels,
    error::TimerError,
    tasks::{Control, CountdownHandle},
};

/// Shared state behind every HTTP handler
#[derive(Debug)]
pub struct AppState {
    /// Configuration screen pickers
    pub pickers: Arc<Mutex<SelectionPickers>>,
    /// Handle to the single countdown task
    pub engine: CountdownHandle,
    /// Display strings for both screens
    pub labels: Labels,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        engine: CountdownHandle,
        pickers: SelectionPickers,
        labels: Labels,
    ) -> Self {
        Self {
            pickers: Arc::new(Mutex::new(pickers)),
            engine,
            labels,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Apply `updater` to the pickers and return a copy of the result
    pub fn update_pickers<F, T>(&self, action: &str, updater: F) -> Result<(T, SelectionPickers), TimerError>
    where
        F: FnOnce(&mut SelectionPickers) -> Result<T, TimerError>,
    {
        let mut pickers = self.pickers.lock()
            .map_err(|_| TimerError::StatePoisoned("picker"))?;

        let output = updater(&mut *pickers)?;
        let snapshot = pickers.clone();
        drop(pickers); // Release the lock early

        self.record_action(action);
        Ok((output, snapshot))
    }

    /// Settle one picker after a scroll gesture stopped at `first_visible`
    pub fn settle_picker(&self, field: PickerField, first_visible: usize) -> Result<SelectionPickers, TimerError> {
        let (value, pickers) = self.update_pickers("settle", |pickers| {
            Ok(pickers.get_mut(field).settle(first_visible))
        })?;
        info!("Picker {} settled on {}", field, value);
        Ok(pickers)
    }

    /// Center a value on one picker directly
    pub fn select_picker_value(&self, field: PickerField, value: u32) -> Result<SelectionPickers, TimerError> {
        let (_, pickers) = self.update_pickers("select", |pickers| pickers.get_mut(field).center_on(value))?;
        info!("Picker {} set to {}", field, value);
        Ok(pickers)
    }

    /// Current picker columns
    pub fn get_pickers(&self) -> Result<SelectionPickers, TimerError> {
        self.pickers.lock()
            .map(|pickers| pickers.clone())
            .map_err(|_| TimerError::StatePoisoned("picker"))
    }

    /// Start a countdown from `selection`, or from the pickers when none is given
    pub async fn start_timer(&self, selection: Option<TimeSelection>) -> Result<CountdownState, TimerError> {
        let selection = match selection {
            Some(selection) => selection,
            None => self.get_pickers()?.selection(),
        };
        let state = self.engine.start(selection).await?;
        self.record_action("start");
        Ok(state)
    }

    /// Forward a pause/resume/toggle/stop control to the engine
    pub async fn control_timer(&self, control: Control) -> Result<CountdownState, TimerError> {
        let state = self.engine.control(control).await?;
        self.record_action(control.as_str());
        Ok(state)
    }

    /// Latest countdown snapshot
    pub fn get_timer_state(&self) -> Option<CountdownState> {
        self.engine.snapshot()
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{state::TimerPhase, tasks::spawn_countdown};

    fn app_state() -> AppState {
        AppState::new(
            0,
            "127.0.0.1".to_string(),
            spawn_countdown(Duration::from_secs(1)),
            SelectionPickers::default(),
            Labels::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn start_without_body_uses_picker_selection() {
        let state = app_state();
        state.select_picker_value(PickerField::Hours, 0).unwrap();
        state.select_picker_value(PickerField::Minutes, 0).unwrap();
        state.settle_picker(PickerField::Seconds, 2).unwrap();

        let countdown = state.start_timer(None).await.unwrap();
        assert_eq!(countdown.selection, TimeSelection::new(0, 0, 5));
        assert_eq!(countdown.phase, TimerPhase::Running);
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_picker_update_leaves_selection_alone() {
        let state = app_state();
        let err = state.select_picker_value(PickerField::Hours, 24).unwrap_err();
        assert!(matches!(err, TimerError::FieldOutOfRange { field: "hours", .. }));
        assert_eq!(state.get_pickers().unwrap().selection(), TimeSelection::new(3, 3, 3));
        assert!(state.get_last_action().0.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn control_is_recorded_as_last_action() {
        let state = app_state();
        state.start_timer(Some(TimeSelection::new(0, 0, 30))).await.unwrap();
        let paused = state.control_timer(Control::Pause).await.unwrap();
        assert_eq!(paused.phase, TimerPhase::Paused);
        assert_eq!(state.get_last_action().0.as_deref(), Some("pause"));
        assert!(state.get_last_action().1.is_some());

        state.control_timer(Control::Stop).await.unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn uptime_starts_in_seconds() {
        let state = app_state();
        assert_eq!(state.get_uptime(), "0s");
    }
}
