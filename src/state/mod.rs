//! State management module
//! 
//! This module contains the countdown value, its controller and the
//! application context shared with the HTTP layer.

pub mod countdown_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use countdown_state::{ClockField, CountdownState, Status};
pub use controller::{CountdownController, CountdownEvent, EditPolicy};
pub use app_state::AppState;
