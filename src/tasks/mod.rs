//! Background tasks module
//! 
//! This module contains the background tasks that run alongside the UI loop.

pub mod update_loop;

// Re-export main types
pub use update_loop::UpdateTask;
