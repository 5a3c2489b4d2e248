//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::EditPolicy;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-wheel")]
#[command(about = "A single countdown timer with digit-wheel controls, driven over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Accept clock edits while the countdown is running
    #[arg(long)]
    pub allow_edits_while_running: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn edit_policy(&self) -> EditPolicy {
        if self.allow_edits_while_running {
            EditPolicy::Always
        } else {
            EditPolicy::LockedWhileRunning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["countdown-wheel"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.edit_policy(), EditPolicy::LockedWhileRunning);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "countdown-wheel",
            "-p",
            "8080",
            "--tick-ms",
            "250",
            "--allow-edits-while-running",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.tick_period(), Duration::from_millis(250));
        assert_eq!(config.edit_policy(), EditPolicy::Always);
    }

    #[test]
    fn test_zero_tick_rejected() {
        assert!(Config::try_parse_from(["countdown-wheel", "--tick-ms", "0"]).is_err());
    }
}
