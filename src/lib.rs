//! Countdown Timer - A countdown timer service with scrolling duration pickers
//! 
//! This library provides the duration picker, the countdown state machine and
//! the single background task that ticks it, exposed over HTTP.

pub mod config;
pub mod display;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
