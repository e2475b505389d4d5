//! Timer commands shared by the command line, the IPC channel and the tray

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical timer name as used on the command line (`--timer1` .. `--timer3`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerId {
    Timer1,
    Timer2,
    Timer3,
}

impl TimerId {
    pub const ALL: [TimerId; 3] = [TimerId::Timer1, TimerId::Timer2, TimerId::Timer3];

    /// One-based timer number
    pub fn number(self) -> usize {
        match self {
            TimerId::Timer1 => 1,
            TimerId::Timer2 => 2,
            TimerId::Timer3 => 3,
        }
    }

    pub fn from_number(number: usize) -> Option<Self> {
        match number {
            1 => Some(TimerId::Timer1),
            2 => Some(TimerId::Timer2),
            3 => Some(TimerId::Timer3),
            _ => None,
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer{}", self.number())
    }
}

/// Action requested for one or more timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Toggle the timer (start if stopped)
    Start,
    /// Reset the timer to zero and keep it running
    Restart,
    /// Toggle the timer (stop if running)
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Start => "start",
            Action::Restart => "restart",
            Action::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// A command forwarded from a secondary invocation to the running instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: Action,
    pub timers: Vec<TimerId>,
}

impl Command {
    pub fn new(action: Action, timers: Vec<TimerId>) -> Self {
        Self { action, timers }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn command_wire_format_uses_lowercase_names() {
        let command = Command::new(Action::Restart, vec![TimerId::Timer2, TimerId::Timer3]);
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"action":"restart","timers":["timer2","timer3"]}"#);
    }

    #[test]
    fn timer_numbers_are_one_based() {
        for id in TimerId::ALL {
            assert_eq!(TimerId::from_number(id.number()), Some(id));
        }
        assert_eq!(TimerId::from_number(0), None);
        assert_eq!(TimerId::from_number(4), None);
        assert_eq!(TimerId::Timer3.to_string(), "timer3");
    }
}
