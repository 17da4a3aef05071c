//! Per-image load stamps.

use cairn_shared::errors::{CairnError, CairnResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Idempotency ledger backed by marker files named after each image.
///
/// Only the existence of a marker matters; its content is never read.
#[derive(Clone, Debug)]
pub struct ImageStampTracker {
    state_dir: PathBuf,
}

impl ImageStampTracker {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn stamp_path(&self, name: &str) -> PathBuf {
        self.state_dir.join(name)
    }

    /// True if a stamp exists for `name`.
    ///
    /// A stat failure other than "not found" counts as present, so an
    /// unreadable state directory never triggers a duplicate load.
    pub fn has_image(&self, name: &str) -> bool {
        match std::fs::symlink_metadata(self.stamp_path(name)) {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(image = %name, error = %e, "Cannot stat image stamp, assuming loaded");
                true
            }
        }
    }

    /// Record that `name` has been loaded into the current engine.
    pub fn mark_loaded(&self, name: &str) -> CairnResult<()> {
        std::fs::create_dir_all(&self.state_dir).map_err(|e| {
            CairnError::Storage(format!(
                "failed to create stamp dir {}: {}",
                self.state_dir.display(),
                e
            ))
        })?;

        let path = self.stamp_path(name);
        std::fs::File::create(&path).map_err(|e| {
            CairnError::Storage(format!("failed to write stamp {}: {}", path.display(), e))
        })?;

        tracing::debug!(image = %name, stamp = %path.display(), "Recorded image stamp");
        Ok(())
    }

    /// Remove every stamp. A missing directory is already clear.
    pub fn clear(&self) -> CairnResult<()> {
        match std::fs::remove_dir_all(&self.state_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CairnError::Storage(format!(
                "failed to clear stamp dir {}: {}",
                self.state_dir.display(),
                e
            ))),
        }
    }
}
