//! Block device lookup for `LABEL=`, `UUID=` and path specs.

use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

/// Resolves a device spec to an existing block device.
pub trait DeviceResolver: Send + Sync {
    /// Path of the block device named by `spec`, or `None` if there is none.
    fn resolve(&self, spec: &str) -> Option<PathBuf>;
}

/// Resolver backed by the udev-style links under a device root.
#[derive(Clone, Debug)]
pub struct SysDeviceResolver {
    dev_root: PathBuf,
}

impl SysDeviceResolver {
    pub fn new(dev_root: impl Into<PathBuf>) -> Self {
        Self {
            dev_root: dev_root.into(),
        }
    }

    fn candidate(&self, spec: &str) -> Option<PathBuf> {
        if let Some(label) = spec.strip_prefix("LABEL=") {
            return Some(self.dev_root.join("disk/by-label").join(label));
        }
        if let Some(uuid) = spec.strip_prefix("UUID=") {
            return Some(self.dev_root.join("disk/by-uuid").join(uuid));
        }
        if spec.starts_with('/') {
            return Some(PathBuf::from(spec));
        }
        Some(self.dev_root.join(spec))
    }
}

impl DeviceResolver for SysDeviceResolver {
    fn resolve(&self, spec: &str) -> Option<PathBuf> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }

        let candidate = self.candidate(spec)?;
        let resolved = std::fs::canonicalize(&candidate).ok()?;
        if is_block_device(&resolved) {
            tracing::debug!(spec, device = %resolved.display(), "Resolved device");
            Some(resolved)
        } else {
            None
        }
    }
}

fn is_block_device(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_block_device())
        .unwrap_or(false)
}
