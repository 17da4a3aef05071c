//! Boot-time settings.

use crate::config::ConfigLayer;
use crate::layout::BootLayout;
use cairn_shared::constants::paths;
use std::path::PathBuf;

/// Everything `cairn-init` needs before any configuration is loaded.
#[derive(Clone, Debug)]
pub struct InitOptions {
    pub layout: BootLayout,
    /// Write logs to `{log_dir}/init.log`. Stderr when unset.
    pub log_dir: Option<PathBuf>,
    /// Configuration layers, lowest precedence first.
    pub config_layers: Vec<ConfigLayer>,
    /// Allow fetching remote configuration and service indexes.
    pub network: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            layout: BootLayout::default(),
            log_dir: Some(PathBuf::from(paths::LOG_DIR)),
            config_layers: vec![
                ConfigLayer::optional(paths::SYSTEM_CONFIG),
                ConfigLayer::optional(paths::CLOUD_CONFIG),
            ],
            network: false,
        }
    }
}

impl InitOptions {
    /// Replace the configuration layers with `locations`, all required.
    pub fn with_config_locations(mut self, locations: &[String]) -> Self {
        self.config_layers = locations
            .iter()
            .filter(|location| !location.is_empty())
            .map(|location| ConfigLayer::required(location.clone()))
            .collect();
        self
    }
}
