//! Early-boot orchestrator for a container-centric operating system.
//!
//! Boot runs in two stages. The bootstrap stage starts a throwaway engine,
//! loads bootstrap images, runs bootstrap containers and formats the state
//! disk if needed, then tears the engine down. The system-init stage loads
//! the remaining images and hands off to the steady-state services.
//!
//! Both stages read a configuration composed by deep-merging layered YAML
//! sources (see [`merge`] and [`config`]).

pub mod compose;
pub mod config;
pub mod engine;
pub mod images;
pub mod init;
pub mod layout;
pub mod merge;
pub mod options;
pub mod pipeline;
pub mod resource;
pub mod util;

pub use cairn_shared::errors::{CairnError, CairnResult};
pub use layout::BootLayout;
pub use options::InitOptions;
