//! IPC response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// Reply sent back to a forwarding invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<TimerSnapshot>,
}

impl CommandResponse {
    /// Create a new command response
    pub fn new(status: String, message: String, timers: Vec<TimerSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timers,
        }
    }

    /// Create a success response
    pub fn ok(message: String, timers: Vec<TimerSnapshot>) -> Self {
        Self::new("ok".to_string(), message, timers)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message, Vec::new())
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
