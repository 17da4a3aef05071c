//! Shared state of one boot stage.

use crate::compose::{CommandComposer, ServiceComposer};
use crate::config::CloudConfig;
use crate::images::{EngineImageStore, ImageStampTracker, ImageStore};
use crate::layout::BootLayout;
use crate::util::{DeviceResolver, SysDeviceResolver};
use std::sync::Arc;

/// Configuration and collaborators every init step reads.
///
/// Built once per stage and never mutated while the stage runs.
pub struct InitContext {
    pub config: CloudConfig,
    pub layout: BootLayout,
    pub composer: Arc<dyn ServiceComposer>,
    pub images: Arc<dyn ImageStore>,
    pub stamps: ImageStampTracker,
    pub devices: Arc<dyn DeviceResolver>,
}

/// Context handle passed to every pipeline task.
pub type InitCtx = Arc<InitContext>;

impl InitContext {
    /// Context wired to the real engine, composer and device tree.
    pub fn new(config: CloudConfig, layout: BootLayout) -> Self {
        let composer = CommandComposer::new(&layout.compose_bin, layout.engine_host.clone());
        let images = EngineImageStore::new(&layout.engine_bin, layout.engine_host.clone());
        let stamps = ImageStampTracker::new(&layout.stamp_dir);
        let devices = SysDeviceResolver::new(&layout.dev_root);

        Self {
            config,
            layout,
            composer: Arc::new(composer),
            images: Arc::new(images),
            stamps,
            devices: Arc::new(devices),
        }
    }

    pub fn with_composer(mut self, composer: Arc<dyn ServiceComposer>) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_image_store(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = images;
        self
    }

    pub fn with_device_resolver(mut self, devices: Arc<dyn DeviceResolver>) -> Self {
        self.devices = devices;
        self
    }

    pub fn into_shared(self) -> InitCtx {
        Arc::new(self)
    }
}
