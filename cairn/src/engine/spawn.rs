//! Engine process launching.

use crate::util::kv_pairs_to_map;
use cairn_shared::errors::{CairnError, CairnResult};
use std::fs::OpenOptions;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::Stdio;

/// How to launch one engine instance.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    /// Engine binary.
    pub bin: PathBuf,
    /// Full argument list passed to the binary.
    pub args: Vec<String>,
    /// System-state directory owned by this instance, removed on stop.
    pub home: PathBuf,
    /// Socket the engine serves on, exported to the child as `DOCKER_HOST`.
    pub host: Option<String>,
    /// Run in the background. When false the current process is replaced.
    pub fork: bool,
    /// Append engine output to this file.
    pub log_file: Option<PathBuf>,
    /// Discard engine output entirely. Takes precedence over `log_file`.
    pub no_log: bool,
    /// Extra `KEY=VALUE` environment entries.
    pub env: Vec<String>,
}

impl LaunchOptions {
    /// Copy of these options suitable for a pre-console background engine.
    pub fn for_bootstrap(&self) -> Self {
        Self {
            fork: true,
            log_file: None,
            no_log: true,
            ..self.clone()
        }
    }

    fn output(&self) -> CairnResult<(Stdio, Stdio)> {
        if self.no_log {
            return Ok((Stdio::null(), Stdio::null()));
        }
        match &self.log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        CairnError::Storage(format!(
                            "failed to open engine log {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                let err = file.try_clone()?;
                Ok((Stdio::from(file), Stdio::from(err)))
            }
            None => Ok((Stdio::inherit(), Stdio::inherit())),
        }
    }

    fn command(&self) -> CairnResult<std::process::Command> {
        let mut cmd = std::process::Command::new(&self.bin);
        cmd.args(&self.args);
        cmd.envs(kv_pairs_to_map(&self.env));
        if let Some(host) = &self.host {
            cmd.env("DOCKER_HOST", host);
        }

        let (stdout, stderr) = self.output()?;
        cmd.stdin(Stdio::null());
        cmd.stdout(stdout);
        cmd.stderr(stderr);
        Ok(cmd)
    }
}

/// Spawn the engine as a background child process.
pub(crate) fn spawn_engine(options: &LaunchOptions) -> CairnResult<tokio::process::Child> {
    let mut cmd = tokio::process::Command::from(options.command()?);
    cmd.kill_on_drop(false);

    cmd.spawn().map_err(|e| {
        let err_msg = format!(
            "Failed to spawn engine at {}: {}",
            options.bin.display(),
            e
        );
        tracing::error!("{}", err_msg);
        CairnError::Engine(err_msg)
    })
}

/// Replace the current process with the engine. Only returns on failure.
pub(crate) fn exec_engine(options: &LaunchOptions) -> CairnError {
    let mut cmd = match options.command() {
        Ok(cmd) => cmd,
        Err(e) => return e,
    };
    let e = cmd.exec();
    CairnError::Engine(format!(
        "Failed to exec engine at {}: {}",
        options.bin.display(),
        e
    ))
}
