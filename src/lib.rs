//! xTimer Indicator - three independent stopwatches in the system tray
//! 
//! This library provides the timer bookkeeping, the per-timer update tasks,
//! the tray surface and the control socket used to drive a running instance
//! from the command line.

pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::TimerRegistry;
pub use utils::signals::shutdown_signal;
