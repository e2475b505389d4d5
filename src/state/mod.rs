//! State management module
//! 
//! This module contains the timer state, the indicators owning it and the
//! registry handed to everything that needs to reach a timer.

pub mod command;
pub mod registry;
pub mod timer_indicator;
pub mod timer_state;

// Re-export main types
pub use command::{Action, Command, TimerId};
pub use registry::TimerRegistry;
pub use timer_indicator::{TimerIndicator, TimerSnapshot};
pub use timer_state::{Baseline, TimerState};

/// Number of timers shown in the tray
pub const INDICATOR_COUNT: usize = 3;
