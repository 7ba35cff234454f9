//! Countdown state and its transitions
//!
//! The transitions here are pure: the owning task decides *when* a tick
//! happens, this module decides *what* a tick does.

use serde::{Deserialize, Serialize};

use super::TimeSelection;
use crate::error::TimerError;

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Running,
    Paused,
    /// Remaining time reached zero
    Finished,
    /// Stopped by the user
    Stopped,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
            TimerPhase::Stopped => "stopped",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TimerPhase::Running)
    }

    /// Finished and Stopped absorb every further control
    pub fn is_terminal(&self) -> bool {
        matches!(self, TimerPhase::Finished | TimerPhase::Stopped)
    }
}

/// Snapshot of a countdown in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Duration the timer was started with
    pub selection: TimeSelection,
    pub total_seconds: u64,
    pub elapsed_seconds: u64,
    pub remaining_hours: u32,
    pub remaining_minutes: u32,
    pub remaining_seconds: u32,
    pub phase: TimerPhase,
    /// elapsed / total, in [0, 1]
    pub progress: f64,
}

impl CountdownState {
    /// Create a running countdown for `selection`
    pub fn start(selection: TimeSelection) -> Result<Self, TimerError> {
        selection.validate()?;
        Ok(Self {
            selection,
            total_seconds: selection.total_seconds(),
            elapsed_seconds: 0,
            remaining_hours: selection.hours,
            remaining_minutes: selection.minutes,
            remaining_seconds: selection.seconds,
            phase: TimerPhase::Running,
            progress: 0.0,
        })
    }

    /// Advance by one second; a no-op unless running
    ///
    /// A seconds borrow refills with 59 and may cascade into an hours borrow
    /// within the same tick, so the remaining fields always add up to
    /// `total_seconds - elapsed_seconds`.
    pub fn tick(&mut self) -> TimerPhase {
        if !self.phase.is_running() {
            return self.phase;
        }

        self.elapsed_seconds += 1;

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        } else if self.remaining_minutes >= 1 {
            self.remaining_minutes -= 1;
            self.remaining_seconds = 59;
        } else if self.remaining_hours >= 1 {
            self.remaining_hours -= 1;
            self.remaining_minutes = 59;
            self.remaining_seconds = 59;
        }

        if self.remaining_hours == 0 && self.remaining_minutes == 0 && self.remaining_seconds == 0 {
            self.phase = TimerPhase::Finished;
        }

        self.progress = (self.elapsed_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0);
        self.phase
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        self.transition("pause", TimerPhase::Running, TimerPhase::Paused)
    }

    pub fn resume(&mut self) -> Result<(), TimerError> {
        self.transition("resume", TimerPhase::Paused, TimerPhase::Running)
    }

    /// Stop the countdown; stopping a finished or stopped timer changes nothing
    pub fn stop(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = TimerPhase::Stopped;
        }
    }

    /// Seconds still to count down
    pub fn remaining_total(&self) -> u64 {
        u64::from(self.remaining_hours) * 3600
            + u64::from(self.remaining_minutes) * 60
            + u64::from(self.remaining_seconds)
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: TimerPhase,
        to: TimerPhase,
    ) -> Result<(), TimerError> {
        if self.phase != from {
            return Err(TimerError::InvalidTransition {
                action,
                phase: self.phase.as_str(),
            });
        }
        self.phase = to;
        Ok(())
    }
}
