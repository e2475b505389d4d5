//! Configuration and CLI argument handling

use std::{env, fmt, path::PathBuf, str::FromStr};

use clap::Parser;

use crate::state::{Action, Command, TimerId, INDICATOR_COUNT};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "xtimer-indicator")]
#[command(about = "Three independent stopwatch timers in the system tray")]
#[command(version)]
pub struct Config {
    /// Start the selected timer(s) in the running instance
    #[arg(short = 'S', long)]
    pub start: bool,

    /// Reset the selected timer(s) in the running instance
    #[arg(short = 'R', long)]
    pub restart: bool,

    /// Stop the selected timer(s) in the running instance
    #[arg(short = 'P', long)]
    pub stop: bool,

    /// Select timer 1
    #[arg(short = '1', long)]
    pub timer1: bool,

    /// Select timer 2
    #[arg(short = '2', long)]
    pub timer2: bool,

    /// Select timer 3
    #[arg(short = '3', long)]
    pub timer3: bool,

    /// Tray position of timer1, timer2 and timer3 (comma separated)
    #[arg(long, default_value = "1,2,3")]
    pub timer_order: TimerOrder,

    /// Path of the control socket used to reach the running instance
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Log label changes instead of showing tray indicators
    #[arg(long)]
    pub headless: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What this process should do with its command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Become the primary instance and run the tray
    Launch,
    /// Hand a command to the primary instance
    Forward(Command),
    /// An action without any timer selected; nothing to do
    Ignored(Action),
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the control socket location
    pub fn socket_path(&self) -> PathBuf {
        match &self.socket {
            Some(path) => path.clone(),
            None => {
                let runtime_dir = env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
                PathBuf::from(runtime_dir).join("xtimer-indicator.sock")
            }
        }
    }

    /// Timers selected with `--timer1` .. `--timer3`, in flag order
    pub fn selected_timers(&self) -> Vec<TimerId> {
        [self.timer1, self.timer2, self.timer3]
            .into_iter()
            .zip(TimerId::ALL)
            .filter_map(|(selected, id)| selected.then_some(id))
            .collect()
    }

    /// The first action flag present wins: start, then restart, then stop
    pub fn action(&self) -> Option<Action> {
        if self.start {
            Some(Action::Start)
        } else if self.restart {
            Some(Action::Restart)
        } else if self.stop {
            Some(Action::Stop)
        } else {
            None
        }
    }

    pub fn invocation(&self) -> Invocation {
        match self.action() {
            None => Invocation::Launch,
            Some(action) => {
                let timers = self.selected_timers();
                if timers.is_empty() {
                    Invocation::Ignored(action)
                } else {
                    Invocation::Forward(Command::new(action, timers))
                }
            }
        }
    }
}

/// Maps each logical timer onto a tray slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerOrder([usize; INDICATOR_COUNT]);

impl TimerOrder {
    /// Zero-based slot for a timer
    pub fn slot(&self, id: TimerId) -> usize {
        self.0[id.number() - 1]
    }

    /// Logical timer shown in a slot
    pub fn timer_at(&self, slot: usize) -> Option<TimerId> {
        self.0
            .iter()
            .position(|&s| s == slot)
            .and_then(|index| TimerId::from_number(index + 1))
    }
}

impl Default for TimerOrder {
    fn default() -> Self {
        Self([0, 1, 2])
    }
}

impl FromStr for TimerOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let positions = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("'{}' is not a tray position", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if positions.len() != INDICATOR_COUNT {
            return Err(format!(
                "expected {} positions, got {}",
                INDICATOR_COUNT,
                positions.len()
            ));
        }

        let mut slots = [0; INDICATOR_COUNT];
        let mut seen = [false; INDICATOR_COUNT];
        for (index, position) in positions.into_iter().enumerate() {
            if !(1..=INDICATOR_COUNT).contains(&position) {
                return Err(format!("position {} is out of range 1..={}", position, INDICATOR_COUNT));
            }
            if seen[position - 1] {
                return Err(format!("position {} is used twice", position));
            }
            seen[position - 1] = true;
            slots[index] = position - 1;
        }

        Ok(Self(slots))
    }
}

impl fmt::Display for TimerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0] + 1, self.0[1] + 1, self.0[2] + 1)
    }
}
