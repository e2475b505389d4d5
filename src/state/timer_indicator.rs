//! A single tray timer: its state plus the task publishing its label

use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc::UnboundedSender, Mutex},
    time::Instant,
};
use tracing::{debug, info, warn};

use super::{TimerId, TimerState};
use crate::{tasks::UpdateTask, ui::LabelUpdate, utils::format_elapsed};

/// Point-in-time view of one indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub timer: TimerId,
    pub slot: usize,
    pub running: bool,
    pub elapsed_seconds: u64,
    pub label: String,
}

#[derive(Debug, Default)]
struct Inner {
    state: TimerState,
    task: Option<UpdateTask>,
}

/// One stopwatch indicator.
///
/// Operations are serialized through an async mutex that stays held while a
/// previous update task is being joined, so at most one task per indicator
/// is ever publishing.
#[derive(Debug)]
pub struct TimerIndicator {
    slot: usize,
    timer: TimerId,
    labels: UnboundedSender<LabelUpdate>,
    inner: Mutex<Inner>,
}

impl TimerIndicator {
    pub fn new(slot: usize, timer: TimerId, labels: UnboundedSender<LabelUpdate>) -> Self {
        Self {
            slot,
            timer,
            labels,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// Start if stopped, stop if running. Elapsed time is kept either way.
    pub async fn toggle(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if inner.state.is_running() {
            let elapsed = inner.state.stop(now);
            if let Some(task) = inner.task.take() {
                task.stop().await;
            }
            // The display must match the banked value, not the last tick
            let label = format_elapsed(elapsed);
            info!("{} stopped at {}", self.timer, label);
            if self.labels.send(LabelUpdate { slot: self.slot, label }).is_err() {
                warn!("UI queue closed, frozen label of {} not shown", self.timer);
            }
            false
        } else {
            let baseline = inner.state.start(now);
            inner.task = Some(UpdateTask::spawn(self.slot, baseline, self.labels.clone()));
            info!("{} started from {}", self.timer, format_elapsed(baseline.prior));
            true
        }
    }

    /// Run from zero regardless of the current state
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(task) = inner.task.take() {
            debug!("Waiting for the running update task of {} to finish", self.timer);
            task.stop().await;
        }

        let baseline = inner.state.reset(Instant::now());
        inner.task = Some(UpdateTask::spawn(self.slot, baseline, self.labels.clone()));
        info!("{} reset", self.timer);
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.state.is_running()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        let inner = self.inner.lock().await;
        let elapsed = inner.state.elapsed(Instant::now());
        TimerSnapshot {
            timer: self.timer,
            slot: self.slot,
            running: inner.state.is_running(),
            elapsed_seconds: elapsed.as_secs(),
            label: format_elapsed(elapsed),
        }
    }

    /// Stop publishing without touching the timer state
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.task.take() {
            task.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::{
        sync::mpsc::{self, UnboundedReceiver},
        time::sleep,
    };

    use super::*;

    fn drain(rx: &mut UnboundedReceiver<LabelUpdate>) -> Vec<String> {
        let mut labels = Vec::new();
        while let Ok(update) = rx.try_recv() {
            labels.push(update.label);
        }
        labels
    }

    fn last_label(rx: &mut UnboundedReceiver<LabelUpdate>) -> Option<String> {
        drain(rx).pop()
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_between_stopped_and_running() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(0, TimerId::Timer1, tx);

        assert!(!indicator.is_running().await);
        assert!(indicator.toggle().await);
        assert!(indicator.is_running().await);
        assert!(!indicator.toggle().await);
        assert!(!indicator.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn start_stop_resume_reset_scenario() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(0, TimerId::Timer1, tx);

        indicator.toggle().await;
        sleep(Duration::from_millis(65_500)).await;
        assert_eq!(last_label(&mut rx).as_deref(), Some("01:05"));

        indicator.toggle().await;
        sleep(Duration::from_secs(30)).await;
        assert_eq!(drain(&mut rx), vec!["01:05"]);
        assert_eq!(indicator.snapshot().await.label, "01:05");

        indicator.toggle().await;
        sleep(Duration::from_millis(10_200)).await;
        assert_eq!(last_label(&mut rx).as_deref(), Some("01:15"));

        indicator.reset().await;
        sleep(Duration::from_millis(100)).await;
        assert_eq!(drain(&mut rx), vec!["00:00"]);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(last_label(&mut rx).as_deref(), Some("00:03"));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_running_never_interleaves_labels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(1, TimerId::Timer2, tx);

        indicator.toggle().await;
        sleep(Duration::from_millis(42_500)).await;
        drain(&mut rx);

        indicator.reset().await;
        sleep(Duration::from_millis(5_500)).await;

        // Only the fresh task publishes, in order from zero
        assert_eq!(drain(&mut rx), vec!["00:00", "00:01", "00:02", "00:03", "00:04", "00:05"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_from_stopped_starts_from_zero() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(2, TimerId::Timer3, tx);

        indicator.toggle().await;
        sleep(Duration::from_millis(20_500)).await;
        indicator.toggle().await;
        drain(&mut rx);

        indicator.reset().await;
        assert!(indicator.is_running().await);
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(drain(&mut rx), vec!["00:00", "00:01", "00:02"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_label_matches_banked_time() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(0, TimerId::Timer1, tx);

        indicator.toggle().await;
        sleep(Duration::from_millis(500)).await;
        indicator.toggle().await;
        indicator.toggle().await;
        sleep(Duration::from_millis(700)).await;
        indicator.toggle().await;

        // 1.2s banked: the last tick showed 00:00 but the display must not lag
        let snapshot = indicator.snapshot().await;
        assert_eq!(snapshot.label, "00:01");
        assert_eq!(last_label(&mut rx).as_deref(), Some("00:01"));

        sleep(Duration::from_secs(5)).await;
        assert_eq!(last_label(&mut rx), None);
    }

    #[tokio::test(start_paused = true)]
    async fn labels_are_tagged_with_the_indicator_slot() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let indicator = TimerIndicator::new(2, TimerId::Timer1, tx);

        indicator.toggle().await;
        sleep(Duration::from_millis(500)).await;
        let update = rx.try_recv().unwrap();
        assert_eq!(update.slot, 2);

        indicator.shutdown().await;
        assert!(indicator.is_running().await);
    }
}
