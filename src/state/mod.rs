//! State management module
//! 
//! This module contains the duration pickers, the countdown state machine and
//! the shared application state that ties them together.

pub mod time_selection;
pub mod picker_state;
pub mod countdown_state;
pub mod app_state;

// Re-export main types
pub use time_selection::TimeSelection;
pub use picker_state::{PickerField, PickerRow, PickerState, SelectionPickers};
pub use countdown_state::{CountdownState, TimerPhase};
pub use app_state::AppState;
