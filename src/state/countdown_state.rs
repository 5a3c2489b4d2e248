//! Countdown clock value and run status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Run status of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Finished,
}

/// One of the three digit wheels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockField {
    Hours,
    Minutes,
    Seconds,
}

impl ClockField {
    /// Largest value the field can hold
    pub fn max(self) -> u8 {
        match self {
            ClockField::Hours => 23,
            ClockField::Minutes | ClockField::Seconds => 59,
        }
    }

    /// Parse a field from its URL name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hours" => Some(ClockField::Hours),
            "minutes" => Some(ClockField::Minutes),
            "seconds" => Some(ClockField::Seconds),
            _ => None,
        }
    }

    /// Normalize a raw edit into the field's range.
    ///
    /// Values above the maximum wrap to 0 and negative values wrap to the
    /// maximum, so a wheel scrolled past either end lands on the other one.
    pub fn wrap(self, value: i64) -> u8 {
        let max = self.max();
        if value > max as i64 {
            0
        } else if value < 0 {
            max
        } else {
            value as u8
        }
    }
}

impl fmt::Display for ClockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClockField::Hours => "hours",
            ClockField::Minutes => "minutes",
            ClockField::Seconds => "seconds",
        };
        f.write_str(name)
    }
}

/// Countdown state: an hours/minutes/seconds duration plus its run status.
///
/// Deserialized snapshots are range-checked, so a decoded value never holds
/// a field above its wheel's maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCountdownState")]
pub struct CountdownState {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub status: Status,
}

/// Unchecked wire form of `CountdownState`
#[derive(Deserialize)]
struct RawCountdownState {
    hours: u8,
    minutes: u8,
    seconds: u8,
    status: Status,
}

impl TryFrom<RawCountdownState> for CountdownState {
    type Error = String;

    fn try_from(raw: RawCountdownState) -> Result<Self, Self::Error> {
        let fields = [
            (ClockField::Hours, raw.hours),
            (ClockField::Minutes, raw.minutes),
            (ClockField::Seconds, raw.seconds),
        ];
        for (field, value) in fields {
            if value > field.max() {
                return Err(format!("{} out of range: {} > {}", field, value, field.max()));
            }
        }

        Ok(Self {
            hours: raw.hours,
            minutes: raw.minutes,
            seconds: raw.seconds,
            status: raw.status,
        })
    }
}

impl CountdownState {
    /// Create an idle state with a zero clock
    pub fn new() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            status: Status::Idle,
        }
    }

    /// Read a single clock field
    pub fn field(&self, field: ClockField) -> u8 {
        match field {
            ClockField::Hours => self.hours,
            ClockField::Minutes => self.minutes,
            ClockField::Seconds => self.seconds,
        }
    }

    /// Write a single clock field, applying wrap-around
    pub fn set_field(&mut self, field: ClockField, value: i64) {
        let value = field.wrap(value);
        match field {
            ClockField::Hours => self.hours = value,
            ClockField::Minutes => self.minutes = value,
            ClockField::Seconds => self.seconds = value,
        }
    }

    /// Whole duration in seconds
    pub fn total_seconds(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    /// Remove one second from the clock, borrowing from minutes and hours.
    ///
    /// Returns `true` once the clock has reached zero. A zero clock is left
    /// untouched.
    pub fn decrement(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        }
        self.is_zero()
    }

    pub fn clear_clock(&mut self) {
        self.hours = 0;
        self.minutes = 0;
        self.seconds = 0;
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    /// Clock rendered as `HH:MM:SS`
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CountdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(hours: u8, minutes: u8, seconds: u8) -> CountdownState {
        CountdownState {
            hours,
            minutes,
            seconds,
            status: Status::Idle,
        }
    }

    #[test]
    fn test_wrap_hours() {
        assert_eq!(ClockField::Hours.wrap(24), 0);
        assert_eq!(ClockField::Hours.wrap(-1), 23);
        assert_eq!(ClockField::Hours.wrap(23), 23);
        assert_eq!(ClockField::Hours.wrap(0), 0);
    }

    #[test]
    fn test_wrap_minutes_and_seconds() {
        for field in [ClockField::Minutes, ClockField::Seconds] {
            assert_eq!(field.wrap(60), 0);
            assert_eq!(field.wrap(-1), 59);
            assert_eq!(field.wrap(59), 59);
            assert_eq!(field.wrap(1000), 0);
            assert_eq!(field.wrap(i64::MIN), 59);
        }
    }

    #[test]
    fn test_set_field_keeps_status() {
        let mut state = CountdownState::new();
        state.status = Status::Paused;
        state.set_field(ClockField::Minutes, -1);
        assert_eq!(state.minutes, 59);
        assert_eq!(state.status, Status::Paused);
        assert_eq!(state.field(ClockField::Minutes), 59);
    }

    #[test]
    fn test_decrement_borrows() {
        let mut state = clock(0, 1, 0);
        assert!(!state.decrement());
        assert_eq!((state.hours, state.minutes, state.seconds), (0, 0, 59));

        let mut state = clock(1, 0, 0);
        assert!(!state.decrement());
        assert_eq!((state.hours, state.minutes, state.seconds), (0, 59, 59));

        let mut state = clock(2, 30, 0);
        state.decrement();
        assert_eq!((state.hours, state.minutes, state.seconds), (2, 29, 59));
    }

    #[test]
    fn test_decrement_reaches_zero() {
        let mut state = clock(0, 0, 1);
        assert!(state.decrement());
        assert!(state.is_zero());

        // Already at zero stays at zero
        assert!(state.decrement());
        assert_eq!(state, clock(0, 0, 0));
    }

    #[test]
    fn test_decrement_matches_total_seconds() {
        let mut state = clock(1, 0, 5);
        let start = state.total_seconds();
        for _ in 0..125 {
            state.decrement();
        }
        assert_eq!(state.total_seconds(), start - 125);
        assert_eq!((state.hours, state.minutes, state.seconds), (0, 58, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(clock(0, 0, 0).display(), "00:00:00");
        assert_eq!(clock(1, 2, 3).display(), "01:02:03");
        assert_eq!(clock(23, 59, 59).to_string(), "23:59:59");
    }

    #[test]
    fn test_field_from_name() {
        assert_eq!(ClockField::from_name("hours"), Some(ClockField::Hours));
        assert_eq!(ClockField::from_name("seconds"), Some(ClockField::Seconds));
        assert_eq!(ClockField::from_name("days"), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }

    #[test]
    fn test_deserialize_checks_ranges() {
        let state: CountdownState = serde_json::from_str(
            r#"{"hours":23,"minutes":59,"seconds":0,"status":"paused"}"#,
        )
        .unwrap();
        assert_eq!(state.display(), "23:59:00");
        assert_eq!(state.status, Status::Paused);

        let err = serde_json::from_str::<CountdownState>(
            r#"{"hours":99,"minutes":0,"seconds":0,"status":"idle"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("hours out of range"));

        assert!(serde_json::from_str::<CountdownState>(
            r#"{"hours":0,"minutes":0,"seconds":60,"status":"idle"}"#,
        )
        .is_err());
    }
}
