//! Countdown Wheel - a single countdown timer with digit-wheel controls
//! 
//! This library provides the countdown controller (wrap-around clock edits,
//! start/pause/stop transitions and a cancellable one-second tick) and the
//! HTTP surface that lets a UI read its state and dispatch commands.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, CountdownController, CountdownState, Status};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
