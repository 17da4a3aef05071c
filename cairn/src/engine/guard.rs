//! Guaranteed engine teardown around bootstrap work.

use super::handle::EngineHandle;
use cairn_shared::errors::CairnResult;
use std::future::Future;

/// Scoped acquisition of a running engine.
///
/// Once an engine has started, [`EngineGuard::run`] stops it on every exit
/// path. If the engine is dropped mid-flight (panic, cancelled future) the
/// handle's `Drop` still signals termination.
pub struct EngineGuard;

impl EngineGuard {
    /// Await `work`, then stop the engine.
    ///
    /// A failure of `work` is returned as-is; a teardown error in that case
    /// is only logged. When `work` succeeds, a teardown error is returned.
    pub async fn run<T, F>(handle: EngineHandle, work: F) -> CairnResult<T>
    where
        F: Future<Output = CairnResult<T>>,
    {
        let pid = handle.pid();
        let result = work.await;

        match (result, handle.stop().await) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(teardown)) => {
                tracing::error!(pid, error = %teardown, "Failed to stop engine");
                Err(teardown)
            }
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(teardown)) => {
                tracing::warn!(
                    pid,
                    error = %teardown,
                    primary = %primary,
                    "Failed to stop engine after bootstrap failure"
                );
                Err(primary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineController, LaunchOptions, ProcessEngineController};
    use cairn_shared::errors::CairnError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn start(home: PathBuf) -> EngineHandle {
        let options = LaunchOptions {
            bin: PathBuf::from("sleep"),
            args: vec!["30".into()],
            home,
            ..Default::default()
        }
        .for_bootstrap();
        ProcessEngineController::new().start(&options).await.unwrap()
    }

    #[tokio::test]
    async fn test_success_stops_engine() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let handle = start(home.clone()).await;
        let pid = handle.pid();

        let value = EngineGuard::run(handle, async { Ok(42) }).await.unwrap();

        assert_eq!(value, 42);
        assert!(!home.exists());
        assert!(!crate::util::is_process_alive(pid));
    }

    #[tokio::test]
    async fn test_failure_still_stops_engine() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let handle = start(home.clone()).await;

        let err = EngineGuard::run(handle, async {
            Err::<(), _>(CairnError::Step("autoformat failed".into()))
        })
        .await
        .unwrap_err();

        match err {
            CairnError::Step(msg) => assert_eq!(msg, "autoformat failed"),
            other => panic!("expected primary error, got {other:?}"),
        }
        assert!(!home.exists());
    }
}
