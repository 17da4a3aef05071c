//! Cloud configuration: typed views and layered loading.

mod loader;
mod types;

pub use loader::{ConfigLayer, ConfigLoader, DEFAULT_CONFIG};
pub use types::{
    CloudConfig, EngineConfig, Repository, ServiceConfig, ServiceSet, StateConfig, SystemConfig,
};
