//! IPC connection handlers

use std::sync::Arc;
use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
};
use tracing::{debug, warn};

use crate::state::{Command, TimerRegistry};
use super::responses::CommandResponse;

/// Serve every request line sent over one connection
pub async fn handle_connection(stream: UnixStream, state: Arc<TimerRegistry>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_request(&line, &state).await;
        let mut payload = serde_json::to_vec(&response)?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
    }

    debug!("IPC client disconnected");
    Ok(())
}

/// Decode and apply a single request line
pub async fn handle_request(line: &str, state: &TimerRegistry) -> CommandResponse {
    match serde_json::from_str::<Command>(line) {
        Ok(command) => {
            let timers = state.apply(&command).await;
            CommandResponse::ok(
                format!("{} applied to {} timer(s)", command.action, timers.len()),
                timers,
            )
        }
        Err(e) => {
            warn!("Ignoring malformed IPC request: {}", e);
            CommandResponse::error(format!("Malformed request: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{config::TimerOrder, state::TimerId};

    #[tokio::test(start_paused = true)]
    async fn valid_request_is_applied() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let state = TimerRegistry::new(TimerOrder::default(), tx);

        let response = handle_request(r#"{"action":"start","timers":["timer3"]}"#, &state).await;

        assert!(response.is_ok());
        assert_eq!(response.timers.len(), 1);
        assert_eq!(response.timers[0].timer, TimerId::Timer3);
        assert!(response.timers[0].running);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_request_changes_nothing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let state = TimerRegistry::new(TimerOrder::default(), tx);

        let response = handle_request(r#"{"action":"launch","timers":["timer9"]}"#, &state).await;

        assert_eq!(response.status, "error");
        assert!(state.snapshot().await.iter().all(|s| !s.running));
    }
}
