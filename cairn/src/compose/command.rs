//! Composer backed by an external compose binary.

use super::ServiceComposer;
use crate::config::{CloudConfig, ServiceSet};
use async_trait::async_trait;
use cairn_shared::errors::{CairnError, CairnResult};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs `<bin> up --project <name>` with the service set as YAML on stdin.
///
/// The binary prints one started service name per line on stdout.
#[derive(Clone, Debug)]
pub struct CommandComposer {
    bin: PathBuf,
    host: String,
}

impl CommandComposer {
    pub fn new(bin: impl Into<PathBuf>, host: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            host: host.into(),
        }
    }
}

#[async_trait]
impl ServiceComposer for CommandComposer {
    async fn run_service_set(
        &self,
        name: &str,
        _cfg: &CloudConfig,
        services: &ServiceSet,
    ) -> CairnResult<Vec<String>> {
        if services.is_empty() {
            tracing::debug!(project = name, "No services to run");
            return Ok(Vec::new());
        }

        let document = serde_yaml::to_string(services)
            .map_err(|e| CairnError::Config(format!("failed to encode services for {name}: {e}")))?;

        tracing::info!(project = name, count = services.len(), "Running service set");
        let mut child = Command::new(&self.bin)
            .args(["up", "--project", name])
            .env("DOCKER_HOST", &self.host)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CairnError::Step(format!(
                    "failed to run composer {}: {}",
                    self.bin.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CairnError::Internal("composer stdin not captured".into()))?;
        let feed = async move {
            let written = stdin.write_all(document.as_bytes()).await;
            drop(stdin);
            written
        };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CairnError::Step(format!(
                "service set {name} failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        written?;

        let started: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        tracing::info!(project = name, started = ?started, "Service set started");
        Ok(started)
    }
}
