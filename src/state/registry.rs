//! Registry of the tray timers

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::{Action, Command, TimerId, TimerIndicator, TimerSnapshot, INDICATOR_COUNT};
use crate::{config::TimerOrder, ui::LabelUpdate};

/// Owns every indicator of the primary instance.
///
/// Created once at startup and shared with the IPC server and the tray
/// control dispatcher.
#[derive(Debug)]
pub struct TimerRegistry {
    indicators: Vec<Arc<TimerIndicator>>,
    order: TimerOrder,
}

impl TimerRegistry {
    /// Create the indicators, all stopped, publishing into `labels`
    pub fn new(order: TimerOrder, labels: UnboundedSender<LabelUpdate>) -> Self {
        let indicators = (0..INDICATOR_COUNT)
            .map(|slot| {
                let timer = order.timer_at(slot).unwrap_or(TimerId::ALL[slot]);
                Arc::new(TimerIndicator::new(slot, timer, labels.clone()))
            })
            .collect();

        info!("Timer order: {}", order);

        Self { indicators, order }
    }

    /// Indicator at a tray slot
    pub fn by_slot(&self, slot: usize) -> Option<&Arc<TimerIndicator>> {
        self.indicators.get(slot)
    }

    /// Indicator a command line timer name refers to
    pub fn get(&self, timer: TimerId) -> &Arc<TimerIndicator> {
        &self.indicators[self.order.slot(timer)]
    }

    /// Apply a forwarded command to every timer it names
    pub async fn apply(&self, command: &Command) -> Vec<TimerSnapshot> {
        let mut snapshots = Vec::with_capacity(command.timers.len());

        for &timer in &command.timers {
            info!("{} command received for {}", command.action, timer);
            let indicator = self.get(timer);
            match command.action {
                Action::Start | Action::Stop => {
                    indicator.toggle().await;
                }
                Action::Restart => indicator.reset().await,
            }
            snapshots.push(indicator.snapshot().await);
        }

        snapshots
    }

    /// Toggle the indicator at a tray slot
    pub async fn toggle_slot(&self, slot: usize) {
        if let Some(indicator) = self.by_slot(slot) {
            indicator.toggle().await;
        } else {
            debug!("Ignoring toggle for unknown slot {}", slot);
        }
    }

    /// Reset the indicator at a tray slot
    pub async fn reset_slot(&self, slot: usize) {
        if let Some(indicator) = self.by_slot(slot) {
            indicator.reset().await;
        } else {
            debug!("Ignoring reset for unknown slot {}", slot);
        }
    }

    /// Snapshot of every timer in tray order
    pub async fn snapshot(&self) -> Vec<TimerSnapshot> {
        let mut snapshots = Vec::with_capacity(self.indicators.len());
        for indicator in &self.indicators {
            snapshots.push(indicator.snapshot().await);
        }
        snapshots
    }

    /// Stop all update tasks
    pub async fn shutdown(&self) {
        for indicator in &self.indicators {
            indicator.shutdown().await;
        }
        debug!("All update tasks stopped");
    }
}
