//! Engine spawning.

use super::handle::EngineHandle;
use super::spawn::{LaunchOptions, exec_engine, spawn_engine};
use async_trait::async_trait;
use cairn_shared::errors::{CairnError, CairnResult};
use std::path::Path;
use std::time::Duration;

const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Trait for launching engines.
///
/// Controllers handle the spawn operation and return an `EngineHandle` for
/// teardown. A failed launch returns no handle and leaves nothing running.
#[async_trait]
pub trait EngineController: Send + Sync {
    async fn start(&self, options: &LaunchOptions) -> CairnResult<EngineHandle>;
}

/// Launches the engine as a local child process.
///
/// When the engine serves on a `unix://` socket, `start` returns only once
/// the socket exists, so no step ever talks to an engine that is not up.
#[derive(Clone, Copy, Debug)]
pub struct ProcessEngineController {
    ready_timeout: Duration,
}

impl Default for ProcessEngineController {
    fn default() -> Self {
        Self {
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }
}

impl ProcessEngineController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ready_timeout(mut self, ready_timeout: Duration) -> Self {
        self.ready_timeout = ready_timeout;
        self
    }

    /// Wait for the engine socket, failing as soon as the engine exits.
    async fn wait_until_ready(&self, handle: &mut EngineHandle, socket: &Path) -> CairnResult<()> {
        let pid = handle.pid();
        tokio::select! {
            ready = wait_for_socket(socket, self.ready_timeout) => ready,
            status = handle.exited() => Err(CairnError::Engine(match status {
                Some(status) => format!("engine pid {pid} exited with {status} before it became ready"),
                None => format!("engine pid {pid} exited before it became ready"),
            })),
        }
    }
}

async fn wait_for_socket(socket: &Path, timeout: Duration) -> CairnResult<()> {
    let poll = async {
        while !tokio::fs::try_exists(socket).await.unwrap_or(false) {
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(timeout, poll).await.map_err(|_| {
        CairnError::Engine(format!(
            "engine socket {} did not appear within {:?}",
            socket.display(),
            timeout
        ))
    })
}

#[async_trait]
impl EngineController for ProcessEngineController {
    async fn start(&self, options: &LaunchOptions) -> CairnResult<EngineHandle> {
        if !options.fork {
            tracing::info!(bin = %options.bin.display(), "Exec'ing engine in the foreground");
            return Err(exec_engine(options));
        }

        let child = spawn_engine(options)?;
        let mut handle = EngineHandle::supervise(child, options.home.clone())?;

        if let Some(socket) = options.host.as_deref().and_then(|h| h.strip_prefix("unix://"))
            && let Err(e) = self.wait_until_ready(&mut handle, Path::new(socket)).await
        {
            tracing::error!(pid = handle.pid(), error = %e, "Engine did not become ready");
            if let Err(stop_err) = handle.stop().await {
                tracing::warn!(error = %stop_err, "Failed to stop engine after failed start");
            }
            return Err(e);
        }

        tracing::info!(
            pid = handle.pid(),
            bin = %options.bin.display(),
            home = %options.home.display(),
            "Engine started"
        );
        Ok(handle)
    }
}
