//! StatusNotifierItem tray indicators

use anyhow::{Context, Result};
use ksni::{menu::StandardItem, Category, Handle, MenuItem, Status, ToolTip, TrayMethods};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::{ControlEvent, DisplaySurface};
use crate::state::INDICATOR_COUNT;

const ICON_NAME: &str = "chronometer";
const INITIAL_LABEL: &str = "00:00";

/// One tray item showing a timer label
#[derive(Debug)]
pub struct TimerTray {
    slot: usize,
    label: String,
    control: UnboundedSender<ControlEvent>,
}

impl TimerTray {
    pub fn new(slot: usize, control: UnboundedSender<ControlEvent>) -> Self {
        Self {
            slot,
            label: INITIAL_LABEL.to_string(),
            control,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn send(&self, event: ControlEvent) {
        if self.control.send(event).is_err() {
            warn!("Dropping {:?}, control queue is closed", event);
        }
    }
}

impl ksni::Tray for TimerTray {
    fn id(&self) -> String {
        format!("xtimer-indicator-{}", self.slot + 1)
    }

    fn title(&self) -> String {
        self.label.clone()
    }

    fn icon_name(&self) -> String {
        ICON_NAME.into()
    }

    fn category(&self) -> Category {
        Category::Communications
    }

    fn status(&self) -> Status {
        Status::Active
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: format!("Timer {}", self.slot + 1),
            description: self.label.clone(),
            ..Default::default()
        }
    }

    // Middle click
    fn secondary_activate(&mut self, _x: i32, _y: i32) {
        self.send(ControlEvent::Toggle(self.slot));
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: "Start / Stop".into(),
                activate: Box::new(|tray: &mut Self| tray.send(ControlEvent::Toggle(tray.slot))),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Reset Timer".into(),
                activate: Box::new(|tray: &mut Self| tray.send(ControlEvent::Reset(tray.slot))),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|tray: &mut Self| tray.send(ControlEvent::Quit)),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// The tray indicators, one per timer slot
pub struct TraySurface {
    handles: Vec<Handle<TimerTray>>,
}

impl TraySurface {
    /// Register every indicator with the session's tray host
    pub async fn spawn(control: UnboundedSender<ControlEvent>) -> Result<Self> {
        let mut handles = Vec::with_capacity(INDICATOR_COUNT);
        for slot in 0..INDICATOR_COUNT {
            let handle = TimerTray::new(slot, control.clone())
                .spawn()
                .await
                .with_context(|| format!("Failed to register tray indicator {}", slot + 1))?;
            debug!("Tray indicator {} registered", slot + 1);
            handles.push(handle);
        }
        info!("{} tray indicators ready", handles.len());
        Ok(Self { handles })
    }
}

impl DisplaySurface for TraySurface {
    async fn set_label(&mut self, slot: usize, label: &str) {
        let Some(handle) = self.handles.get(slot) else {
            warn!("No tray indicator for slot {}", slot);
            return;
        };
        let label = label.to_string();
        if handle.update(move |tray| tray.label = label).await.is_none() {
            warn!("Tray indicator {} is gone, label not shown", slot + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use ksni::Tray;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn new_tray_shows_zero_and_is_named_by_slot() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let tray = TimerTray::new(1, tx);
        assert_eq!(tray.label(), "00:00");
        assert_eq!(tray.id(), "xtimer-indicator-2");
        assert_eq!(tray.title(), "00:00");
    }

    #[test]
    fn middle_click_toggles_own_slot() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tray = TimerTray::new(2, tx);
        tray.secondary_activate(0, 0);
        assert_eq!(rx.try_recv().unwrap(), ControlEvent::Toggle(2));
    }

    #[test]
    fn menu_offers_toggle_reset_and_quit() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let tray = TimerTray::new(0, tx);
        let labels: Vec<String> = tray
            .menu()
            .into_iter()
            .map(|item| match item {
                MenuItem::Standard(item) => item.label,
                MenuItem::Separator => "-".to_string(),
                _ => "?".to_string(),
            })
            .collect();
        assert_eq!(labels, vec!["Start / Stop", "Reset Timer", "-", "Quit"]);
    }
}
