//! Timer state structure and elapsed-time bookkeeping

use std::time::Duration;
use tokio::time::Instant;

/// Stopwatch state for a single indicator
#[derive(Debug, Clone, Default)]
pub struct TimerState {
    running: bool,
    /// Elapsed time banked by earlier runs; `None` until first started
    accumulated: Option<Duration>,
    /// Start of the current run, only set while running
    started_at: Option<Instant>,
}

/// Inputs an update task needs to compute elapsed time on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub started_at: Instant,
    pub prior: Duration,
}

impl Baseline {
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at) + self.prior
    }
}

impl TimerState {
    /// Create a stopped timer that has never run
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed time banked by previous runs
    pub fn accumulated(&self) -> Option<Duration> {
        self.accumulated
    }

    /// Baseline of the current run, if running
    pub fn baseline(&self) -> Option<Baseline> {
        self.started_at.map(|started_at| Baseline {
            started_at,
            prior: self.accumulated.unwrap_or_default(),
        })
    }

    /// Total elapsed time as of `now`, excluding paused intervals
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.baseline() {
            Some(baseline) => baseline.elapsed_at(now),
            None => self.accumulated.unwrap_or_default(),
        }
    }

    /// Begin a run, continuing from any banked time
    pub fn start(&mut self, now: Instant) -> Baseline {
        if !self.running {
            self.running = true;
            self.started_at = Some(now);
        }
        Baseline {
            started_at: self.started_at.unwrap_or(now),
            prior: self.accumulated.unwrap_or_default(),
        }
    }

    /// End the current run and bank its elapsed time
    pub fn stop(&mut self, now: Instant) -> Duration {
        let elapsed = self.elapsed(now);
        if self.running {
            self.running = false;
            self.started_at = None;
            self.accumulated = Some(elapsed);
        }
        elapsed
    }

    /// Discard banked time and run from zero
    pub fn reset(&mut self, now: Instant) -> Baseline {
        self.running = true;
        self.started_at = Some(now);
        self.accumulated = Some(Duration::ZERO);
        Baseline {
            started_at: now,
            prior: Duration::ZERO,
        }
    }
}
