//! Tray interactions routed back to the timers

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::state::TimerRegistry;

/// Interaction with one of the tray indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// "Start / Stop" or middle click
    Toggle(usize),
    /// "Reset Timer"
    Reset(usize),
    /// "Quit" from any indicator
    Quit,
}

/// Apply tray interactions until Quit is chosen or the tray goes away
pub async fn dispatch_control_events(registry: Arc<TimerRegistry>, mut events: UnboundedReceiver<ControlEvent>) {
    while let Some(event) = events.recv().await {
        debug!("Control event: {:?}", event);
        match event {
            ControlEvent::Toggle(slot) => registry.toggle_slot(slot).await,
            ControlEvent::Reset(slot) => registry.reset_slot(slot).await,
            ControlEvent::Quit => {
                info!("Quit selected from the tray");
                return;
            }
        }
    }
    debug!("Control queue closed");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::TimerOrder;

    #[tokio::test(start_paused = true)]
    async fn events_drive_timers_until_quit() {
        let (labels_tx, _labels_rx) = mpsc::unbounded_channel();
        let registry = Arc::new(TimerRegistry::new(TimerOrder::default(), labels_tx));
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(ControlEvent::Toggle(0)).unwrap();
        tx.send(ControlEvent::Reset(2)).unwrap();
        tx.send(ControlEvent::Toggle(0)).unwrap();
        tx.send(ControlEvent::Quit).unwrap();
        tx.send(ControlEvent::Toggle(1)).unwrap();

        dispatch_control_events(Arc::clone(&registry), rx).await;

        let running: Vec<bool> = registry.snapshot().await.into_iter().map(|s| s.running).collect();
        // Events after Quit are not applied
        assert_eq!(running, vec![false, false, true]);
    }
}
