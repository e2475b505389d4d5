//! Control socket module
//!
//! The primary instance listens on a Unix domain socket. Secondary
//! invocations connect to it and send one JSON [`Command`](crate::state::Command)
//! per line; each gets a [`CommandResponse`] line back.

pub mod client;
pub mod handlers;
pub mod responses;

use std::{
    fs,
    os::unix::fs::FileTypeExt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use anyhow::{bail, Context, Result};
use tokio::{net::UnixListener, time::sleep};
use tracing::{debug, error, info, warn};

use crate::state::TimerRegistry;
use handlers::handle_connection;
pub use responses::CommandResponse;

/// Pause after a failed accept, e.g. on EMFILE
const ACCEPT_BACKOFF: Duration = Duration::from_millis(250);

/// Listening control socket; the socket file is removed on drop
#[derive(Debug)]
pub struct ControlSocket {
    listener: UnixListener,
    path: PathBuf,
}

impl ControlSocket {
    /// Bind the control socket, clearing a stale file left by a dead instance
    pub async fn bind(path: &Path) -> Result<Self> {
        if let Ok(metadata) = fs::symlink_metadata(path) {
            if !metadata.file_type().is_socket() {
                bail!("{} exists and is not a socket, refusing to replace it", path.display());
            }
            if client::is_running(path).await? {
                bail!("Another instance is already listening on {}", path.display());
            }
            warn!("Removing stale control socket {}", path.display());
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove stale socket {}", path.display()))?;
        }

        let listener = UnixListener::bind(path)
            .with_context(|| format!("Failed to bind control socket {}", path.display()))?;
        info!("Control socket listening on {}", path.display());

        Ok(Self {
            listener,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept connections forever, one task per client
    pub async fn serve(&self, state: Arc<TimerRegistry>) {
        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    debug!("IPC client connected");
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            warn!("IPC connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept IPC connection: {}", e);
                    sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

impl Drop for ControlSocket {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove control socket {}: {}", self.path.display(), e);
        }
    }
}
