//! Filesystem layout of one boot.

use cairn_shared::constants::{self, paths};
use std::path::PathBuf;

/// Every well-known location the boot stages touch.
///
/// Components receive this explicitly; nothing reads the default paths
/// directly, so tests can point a whole boot at a temp directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootLayout {
    pub images_dir: PathBuf,
    pub images_pattern: String,
    pub stamp_dir: PathBuf,
    pub engine_home: PathBuf,
    pub engine_bin: PathBuf,
    pub engine_host: String,
    pub compose_bin: PathBuf,
    pub dev_root: PathBuf,
    pub os_release: PathBuf,
}

impl Default for BootLayout {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(paths::IMAGES_DIR),
            images_pattern: constants::IMAGES_PATTERN.to_string(),
            stamp_dir: PathBuf::from(paths::STAMP_DIR),
            engine_home: PathBuf::from(paths::ENGINE_HOME),
            engine_bin: PathBuf::from(paths::ENGINE_BIN),
            engine_host: constants::ENGINE_HOST.to_string(),
            compose_bin: PathBuf::from(paths::COMPOSE_BIN),
            dev_root: PathBuf::from(paths::DEV_ROOT),
            os_release: PathBuf::from(paths::OS_RELEASE),
        }
    }
}

impl BootLayout {
    /// Layout rooted at `root`, for tests and chroot-style boots.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let engine_home = root.join("engine");
        Self {
            images_dir: root.join("images"),
            stamp_dir: root.join("cairn-stamps"),
            engine_host: format!("unix://{}", root.join("engine.sock").display()),
            dev_root: root.join("dev"),
            os_release: root.join("os-release"),
            engine_home,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stamps_live_outside_engine_home() {
        let layout = BootLayout::default();
        assert!(!layout.stamp_dir.starts_with(&layout.engine_home));
        assert_eq!(layout.images_pattern, "images*.tar");
    }

    #[test]
    fn test_rooted_layout() {
        let layout = BootLayout::rooted_at("/tmp/boot");
        assert_eq!(layout.images_dir, PathBuf::from("/tmp/boot/images"));
        assert_eq!(layout.stamp_dir, PathBuf::from("/tmp/boot/cairn-stamps"));
        assert_eq!(layout.engine_host, "unix:///tmp/boot/engine.sock");
        assert_eq!(layout.engine_bin, PathBuf::from(paths::ENGINE_BIN));
    }
}
