//! Container image store boundary.

use async_trait::async_trait;
use cairn_shared::errors::{CairnError, CairnResult};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncRead;
use tokio::process::Command;

/// Byte stream of an image archive.
pub type ImageStream = Box<dyn AsyncRead + Send + Unpin>;

/// Loads image archives into the running container engine.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Load every image contained in the `input` archive.
    async fn load_image(&self, name: &str, input: ImageStream) -> CairnResult<()>;
}

/// Image store backed by the engine's own CLI (`<bin> -H <host> load`).
#[derive(Clone, Debug)]
pub struct EngineImageStore {
    bin: PathBuf,
    host: String,
}

impl EngineImageStore {
    pub fn new(bin: impl Into<PathBuf>, host: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            host: host.into(),
        }
    }
}

#[async_trait]
impl ImageStore for EngineImageStore {
    async fn load_image(&self, name: &str, mut input: ImageStream) -> CairnResult<()> {
        let mut child = Command::new(&self.bin)
            .arg("-H")
            .arg(&self.host)
            .arg("load")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CairnError::Engine(format!(
                    "failed to run image load via {}: {}",
                    self.bin.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CairnError::Internal("image load stdin not piped".into()))?;

        // Feed stdin while draining stderr so neither pipe can stall the other
        let feed = async move {
            let copied = tokio::io::copy(&mut input, &mut stdin).await;
            drop(stdin);
            copied
        };
        let (copied, output) = tokio::join!(feed, child.wait_with_output());

        let output = output
            .map_err(|e| CairnError::Engine(format!("image load of {name} did not finish: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CairnError::Step(format!(
                "image load of {} failed ({}): {}",
                name,
                output.status,
                stderr.trim()
            )));
        }

        let bytes = copied
            .map_err(|e| CairnError::Step(format!("failed to stream image {name}: {e}")))?;
        tracing::debug!(image = %name, bytes, "Streamed image into engine");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("engine");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_streams_archive_to_engine() {
        let dir = TempDir::new().unwrap();
        let received = dir.path().join("received.tar");
        let script = write_script(
            &dir,
            &format!("[ \"$3\" = load ] || exit 9\ncat > {}", received.display()),
        );

        let store = EngineImageStore::new(script, "unix:///tmp/engine.sock");
        store
            .load_image("images.tar", Box::new(&b"archive-bytes"[..]))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&received).unwrap(), b"archive-bytes");
    }

    #[tokio::test]
    async fn test_engine_failure_is_step_error() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "cat > /dev/null\necho 'bad archive' >&2\nexit 3");

        let store = EngineImageStore::new(script, "unix:///tmp/engine.sock");
        let err = store
            .load_image("images.tar", Box::new(&b"x"[..]))
            .await
            .unwrap_err();
        assert!(matches!(err, CairnError::Step(ref m) if m.contains("bad archive")));
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_error() {
        let store = EngineImageStore::new("/nonexistent/engine", "unix:///tmp/engine.sock");
        let err = store
            .load_image("images.tar", Box::new(&b"x"[..]))
            .await
            .unwrap_err();
        assert!(matches!(err, CairnError::Engine(_)));
    }
}
