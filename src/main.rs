//! xTimer Indicator - three stopwatches in the system tray
//!
//! This is the main entry point. The first invocation becomes the primary
//! instance and shows the tray; later invocations forward their command to it.

use std::{path::Path, sync::Arc};
use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use xtimer_indicator::{
    api::{client::{self, Dispatch}, ControlSocket},
    config::Config,
    state::{Command, TimerRegistry},
    ui::{dispatch_control_events, run_ui_loop, ControlEvent, DisplaySurface, HeadlessSurface, LabelUpdate, TraySurface},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("xtimer_indicator={}", config.log_level()))
        .init();

    let socket_path = config.socket_path();

    match client::dispatch(&config, &socket_path).await {
        Dispatch::Exit => Ok(()),
        Dispatch::RunPrimary(initial_command) => run_primary(&config, &socket_path, initial_command).await,
    }
}

/// Run the tray, the control socket and the timers until asked to quit
async fn run_primary(config: &Config, socket_path: &Path, initial_command: Option<Command>) -> Result<()> {
    info!("Starting xtimer-indicator v{}", env!("CARGO_PKG_VERSION"));

    let (label_tx, label_rx) = mpsc::unbounded_channel();
    let (control_tx, control_rx) = mpsc::unbounded_channel();

    let state = Arc::new(TimerRegistry::new(config.timer_order, label_tx));
    let socket = ControlSocket::bind(socket_path).await?;

    if config.headless {
        info!("Running headless, labels are logged");
        serve(HeadlessSurface, &state, &socket, label_rx, control_rx, initial_command).await;
    } else {
        let surface = TraySurface::spawn(control_tx.clone()).await?;
        serve(surface, &state, &socket, label_rx, control_rx, initial_command).await;
    }

    state.shutdown().await;
    drop(control_tx);

    info!("xtimer-indicator shutdown complete");
    Ok(())
}

async fn serve<S: DisplaySurface>(
    surface: S,
    state: &Arc<TimerRegistry>,
    socket: &ControlSocket,
    label_rx: UnboundedReceiver<LabelUpdate>,
    control_rx: UnboundedReceiver<ControlEvent>,
    initial_command: Option<Command>,
) {
    if let Some(command) = initial_command {
        state.apply(&command).await;
    }

    tokio::select! {
        _ = socket.serve(Arc::clone(state)) => {}
        _ = run_ui_loop(surface, label_rx) => {
            warn!("UI loop stopped unexpectedly");
        }
        _ = dispatch_control_events(Arc::clone(state), control_rx) => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }
}
