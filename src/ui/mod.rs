//! Display side of the application
//!
//! Update tasks never touch the display directly. They push [`LabelUpdate`]s
//! onto a single queue that the UI loop drains, and tray callbacks push
//! [`ControlEvent`]s back to the timers.

pub mod control;
pub mod tray;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

pub use control::{dispatch_control_events, ControlEvent};
pub use tray::TraySurface;

/// New label text for the indicator in `slot`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    pub slot: usize,
    pub label: String,
}

/// Something that can show timer labels
#[allow(async_fn_in_trait)]
pub trait DisplaySurface {
    async fn set_label(&mut self, slot: usize, label: &str);
}

/// Apply label updates in arrival order until every sender is gone
pub async fn run_ui_loop<S: DisplaySurface>(mut surface: S, mut labels: UnboundedReceiver<LabelUpdate>) {
    debug!("UI loop started");
    while let Some(update) = labels.recv().await {
        surface.set_label(update.slot, &update.label).await;
    }
    debug!("UI loop finished, label queue closed");
}

/// Surface for sessions without a tray host: labels go to the log
#[derive(Debug, Default)]
pub struct HeadlessSurface;

impl DisplaySurface for HeadlessSurface {
    async fn set_label(&mut self, slot: usize, label: &str) {
        info!("Timer {}: {}", slot + 1, label);
    }
}
