//! Per-indicator label update task

use std::time::Duration;
use tokio::{
    sync::{mpsc::UnboundedSender, watch},
    task::JoinHandle,
    time::{interval, Instant},
};
use tracing::{debug, warn};

use crate::{state::Baseline, ui::LabelUpdate, utils::format_elapsed};

const TICK: Duration = Duration::from_secs(1);

/// A running update loop together with the means to stop it
#[derive(Debug)]
pub struct UpdateTask {
    slot: usize,
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl UpdateTask {
    /// Spawn an update loop publishing labels for `slot`
    pub fn spawn(slot: usize, baseline: Baseline, labels: UnboundedSender<LabelUpdate>) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(update_loop(slot, baseline, labels, cancel_rx));
        Self { slot, cancel_tx, handle }
    }

    /// Cancel the loop and wait until it has exited
    pub async fn stop(self) {
        // A closed channel means the loop already returned
        let _ = self.cancel_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Update task for slot {} ended abnormally: {}", self.slot, e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Publish the elapsed time once per second until cancelled
async fn update_loop(
    slot: usize,
    baseline: Baseline,
    labels: UnboundedSender<LabelUpdate>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    debug!("Update loop for slot {} started with {:?} already elapsed", slot, baseline.prior);

    let mut ticker = interval(TICK);

    loop {
        tokio::select! {
            biased;

            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }

            _ = ticker.tick() => {
                let label = format_elapsed(baseline.elapsed_at(Instant::now()));
                if labels.send(LabelUpdate { slot, label }).is_err() {
                    debug!("UI queue closed, stopping update loop for slot {}", slot);
                    break;
                }
            }
        }
    }

    debug!("Update loop for slot {} stopped", slot);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;

    fn drain(rx: &mut UnboundedReceiver<LabelUpdate>) -> Vec<String> {
        let mut labels = Vec::new();
        while let Ok(update) = rx.try_recv() {
            labels.push(update.label);
        }
        labels
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_once_per_second_from_baseline() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let baseline = Baseline {
            started_at: Instant::now(),
            prior: Duration::from_secs(58),
        };
        let task = UpdateTask::spawn(1, baseline, tx);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(drain(&mut rx), vec!["00:58", "00:59", "01:00", "01:01"]);

        task.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_publish_after_stop_returns() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let baseline = Baseline {
            started_at: Instant::now(),
            prior: Duration::ZERO,
        };
        let task = UpdateTask::spawn(0, baseline, tx);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        task.stop().await;
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_ui_queue_is_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let baseline = Baseline {
            started_at: Instant::now(),
            prior: Duration::ZERO,
        };
        let task = UpdateTask::spawn(2, baseline, tx);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(task.is_finished());
        task.stop().await;
    }
}
