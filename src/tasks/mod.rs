//! Background tasks module
//! 
//! This module contains the countdown engine task that runs alongside the HTTP server.

pub mod countdown;

// Re-export main types
pub use countdown::{spawn_countdown, Control, CountdownHandle};
