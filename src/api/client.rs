//! Client side of the control socket, used by secondary invocations

use std::{
    io::{self, ErrorKind},
    path::Path,
};
use anyhow::{anyhow, Context, Result};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::{Config, Invocation},
    state::Command,
};
use super::responses::CommandResponse;

/// Outcome of trying to reach the primary instance
#[derive(Debug)]
pub enum Forwarded {
    /// The primary applied the command
    Delivered(CommandResponse),
    /// Nobody is listening on the socket
    NotRunning,
}

/// What this process does after looking for a running instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing left to do here
    Exit,
    /// Become the primary instance, applying the command first if any
    RunPrimary(Option<Command>),
}

/// Decide between forwarding to a running instance and becoming the primary
pub async fn dispatch(config: &Config, socket_path: &Path) -> Dispatch {
    match config.invocation() {
        Invocation::Ignored(action) => {
            info!("--{} given without a timer, nothing to do", action);
            Dispatch::Exit
        }
        Invocation::Forward(command) => match forward(socket_path, &command).await {
            Ok(Forwarded::Delivered(response)) => {
                log_response(&response);
                Dispatch::Exit
            }
            Ok(Forwarded::NotRunning) => {
                info!("No running instance found, starting one");
                Dispatch::RunPrimary(Some(command))
            }
            Err(e) => {
                error!("Failed to forward command: {:#}", e);
                Dispatch::Exit
            }
        },
        Invocation::Launch => match is_running(socket_path).await {
            Ok(true) => {
                info!("xtimer-indicator is already running");
                Dispatch::Exit
            }
            Ok(false) => Dispatch::RunPrimary(None),
            Err(e) => {
                warn!("Could not probe for a running instance: {:#}", e);
                Dispatch::RunPrimary(None)
            }
        },
    }
}

fn log_response(response: &CommandResponse) {
    if !response.is_ok() {
        warn!("Running instance rejected the command: {}", response.message);
        return;
    }
    for timer in &response.timers {
        info!(
            "{} is {} at {}",
            timer.timer,
            if timer.running { "running" } else { "stopped" },
            timer.label
        );
    }
}

/// Connect to the primary instance, `None` when nobody is listening
pub async fn connect(socket_path: &Path) -> Result<Option<UnixStream>> {
    match UnixStream::connect(socket_path).await {
        Ok(stream) => Ok(Some(stream)),
        Err(e) if is_not_running(&e) => {
            debug!("No instance listening on {}: {}", socket_path.display(), e);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to connect to {}", socket_path.display())),
    }
}

/// Check whether a primary instance is listening
pub async fn is_running(socket_path: &Path) -> Result<bool> {
    Ok(connect(socket_path).await?.is_some())
}

/// Send a command to the primary instance and wait for its reply
pub async fn forward(socket_path: &Path, command: &Command) -> Result<Forwarded> {
    let Some(stream) = connect(socket_path).await? else {
        return Ok(Forwarded::NotRunning);
    };

    let (reader, mut writer) = stream.into_split();
    let mut request = serde_json::to_vec(command)?;
    request.push(b'\n');
    writer
        .write_all(&request)
        .await
        .context("Failed to send command to the running instance")?;

    let mut lines = BufReader::new(reader).lines();
    let line = lines
        .next_line()
        .await
        .context("Failed to read reply from the running instance")?
        .ok_or_else(|| anyhow!("Running instance closed the connection without replying"))?;

    let response = serde_json::from_str(&line).context("Unreadable reply from the running instance")?;
    Ok(Forwarded::Delivered(response))
}

fn is_not_running(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused)
}
