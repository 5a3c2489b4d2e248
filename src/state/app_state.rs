//! Application context shared with the HTTP handlers

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::CountdownController;

/// Main application state: the countdown controller plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// The single countdown driven by this server
    pub controller: Arc<CountdownController>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create a new AppState around an existing controller
    pub fn new(port: u16, host: String, controller: Arc<CountdownController>) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    fn lock_last_action(&self) -> MutexGuard<'_, Option<(String, DateTime<Utc>)>> {
        self.last_action.lock().unwrap_or_else(|poisoned| {
            warn!("Last action lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Remember the most recent command for the status endpoint
    pub fn record_action(&self, action: &str) {
        *self.lock_last_action() = Some((action.to_string(), Utc::now()));
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.lock_last_action().clone() {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_action_starts_empty() {
        let state = AppState::new(0, "127.0.0.1".to_string(), Arc::default());
        assert_eq!(state.get_last_action(), (None, None));
        assert_eq!(state.get_uptime(), "0s");
    }

    #[test]
    fn test_record_action() {
        let state = AppState::new(0, "127.0.0.1".to_string(), Arc::default());
        state.record_action("start");
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }

    #[test]
    fn test_record_action_after_poisoned_lock() {
        let state = AppState::new(0, "127.0.0.1".to_string(), Arc::default());
        state.record_action("start");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = state.last_action.lock().unwrap();
            panic!("poison the lock");
        }));
        assert!(result.is_err());
        assert!(state.last_action.is_poisoned());

        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
        state.record_action("stop");
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }
}
