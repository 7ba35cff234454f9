//! Display strings and readout formatting
//!
//! Screen text lives in [`Labels`], which is handed to whoever renders a view
//! instead of being looked up globally.

use serde::{Deserialize, Serialize};

use crate::state::{TimeSelection, TimerPhase};

/// Text resources for the configuration and timer screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub app_title: String,
    pub timer_title: String,
    pub total_prefix: String,
    pub run: String,
    pub start: String,
    pub pause: String,
    pub stop: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            app_title: "Countdown Timer".to_string(),
            timer_title: "Timing…".to_string(),
            total_prefix: "Total time".to_string(),
            run: "Run timer".to_string(),
            start: "Start".to_string(),
            pause: "Pause".to_string(),
            stop: "Stop".to_string(),
        }
    }
}

impl Labels {
    /// Caption of the play/pause control: "Pause" while running, "Start" otherwise
    pub fn toggle_label(&self, phase: TimerPhase) -> &str {
        if phase.is_running() {
            &self.pause
        } else {
            &self.start
        }
    }

    /// "Total time 1H 30M 0S"
    pub fn total_caption(&self, selection: &TimeSelection) -> String {
        format!(
            "{} {}H {}M {}S",
            self.total_prefix, selection.hours, selection.minutes, selection.seconds
        )
    }
}

/// Zero-pad to at least two digits
pub fn two_digits(value: u64) -> String {
    format!("{:02}", value)
}

/// Format as HH:MM:SS; hours grow past two digits when needed
pub fn format_hms(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
