//! Bootstrap image staging.
//!
//! Image archives shipped in the images directory are streamed into the
//! running engine once per engine instance. Stamps in the state directory
//! record what has been loaded so a repeated pass is a no-op.

mod loader;
mod stamp;
mod store;

pub use loader::{find_images, load_images};
pub use stamp::ImageStampTracker;
pub use store::{EngineImageStore, ImageStore, ImageStream};
