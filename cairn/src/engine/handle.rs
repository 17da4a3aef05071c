//! Handle to one running engine instance.

use cairn_shared::errors::{CairnError, CairnResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Child;
use tokio::sync::oneshot;

use crate::util::{is_process_alive, terminate};

/// A running engine instance.
///
/// The stop handshake lives in a supervising task: it waits for the stop
/// signal, sends SIGTERM, reaps the process and reports back. `stop` consumes
/// the handle, so teardown happens at most once. An engine that exits before
/// it is asked to stop is reaped at once and reported through
/// [`EngineHandle::exited`].
pub struct EngineHandle {
    pid: u32,
    home: PathBuf,
    stop_tx: Option<oneshot::Sender<()>>,
    done_rx: Option<oneshot::Receiver<CairnResult<ExitStatus>>>,
    exited_rx: Option<oneshot::Receiver<ExitStatus>>,
}

impl EngineHandle {
    /// Take ownership of a spawned engine and start its supervisor.
    pub(crate) fn supervise(mut child: Child, home: PathBuf) -> CairnResult<Self> {
        let pid = child
            .id()
            .ok_or_else(|| CairnError::Engine("engine exited before it could be supervised".into()))?;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel();
        let (exited_tx, exited_rx) = oneshot::channel();

        tokio::spawn(async move {
            // A dropped sender is a stop request too.
            let early_exit = tokio::select! {
                _ = &mut stop_rx => None,
                status = child.wait() => Some(status),
            };

            let result = match early_exit {
                None => {
                    tracing::debug!(pid, "Stopping engine");
                    match terminate(pid) {
                        Ok(()) => child.wait().await.map_err(|e| {
                            CairnError::Engine(format!("failed to wait for engine pid {pid}: {e}"))
                        }),
                        Err(e) => Err(e),
                    }
                }
                Some(status) => {
                    let status = status.map_err(|e| {
                        CairnError::Engine(format!("failed to wait for engine pid {pid}: {e}"))
                    });
                    match &status {
                        Ok(status) => {
                            tracing::warn!(pid, status = %status, "Engine exited on its own");
                            let _ = exited_tx.send(*status);
                        }
                        Err(e) => {
                            tracing::warn!(pid, error = %e, "Lost track of engine");
                            drop(exited_tx);
                        }
                    }
                    let _ = stop_rx.await;
                    status
                }
            };
            let _ = done_tx.send(result);
        });

        Ok(Self {
            pid,
            home,
            stop_tx: Some(stop_tx),
            done_rx: Some(done_rx),
            exited_rx: Some(exited_rx),
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_running(&self) -> bool {
        is_process_alive(self.pid)
    }

    /// Resolves once the engine exits without having been asked to stop.
    ///
    /// Yields `None` when the exit status could not be collected. Pends
    /// forever once the exit has already been reported.
    pub(crate) async fn exited(&mut self) -> Option<ExitStatus> {
        let Some(rx) = self.exited_rx.as_mut() else {
            return std::future::pending().await;
        };
        let status = rx.await.ok();
        self.exited_rx = None;
        status
    }

    /// Stop the engine and remove its system-state directory.
    ///
    /// Blocks until the engine process has exited. An engine that already
    /// died on its own is still reaped. The state directory is removed even
    /// when terminating or reaping the engine failed; the first error wins.
    pub async fn stop(mut self) -> CairnResult<()> {
        let (Some(stop_tx), Some(done_rx)) = (self.stop_tx.take(), self.done_rx.take()) else {
            return Err(CairnError::InvalidState("engine already stopped".into()));
        };

        let _ = stop_tx.send(());
        let stopped = done_rx.await.unwrap_or_else(|_| {
            Err(CairnError::Engine(format!(
                "engine supervisor for pid {} exited without confirming shutdown",
                self.pid
            )))
        });
        match &stopped {
            Ok(status) => tracing::info!(pid = self.pid, status = %status, "Engine stopped"),
            Err(e) => tracing::warn!(pid = self.pid, error = %e, "Engine did not stop cleanly"),
        }

        let removed = remove_state(&self.home).await;
        stopped.and(removed)
    }
}

async fn remove_state(home: &Path) -> CairnResult<()> {
    match tokio::fs::remove_dir_all(home).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(CairnError::Storage(format!(
                "failed to remove engine state {}: {}",
                home.display(),
                e
            )));
        }
    }
    tracing::debug!(home = %home.display(), "Removed engine state");
    Ok(())
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.stop_tx.is_none() {
            return;
        }
        // Dropping the sender wakes the supervisor, which terminates the engine.
        tracing::warn!(
            pid = self.pid,
            home = %self.home.display(),
            "Engine handle dropped without stop, state directory left behind"
        );
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("pid", &self.pid)
            .field("home", &self.home)
            .finish()
    }
}
