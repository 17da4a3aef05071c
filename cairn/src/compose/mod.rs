//! Service composition collaborator.
//!
//! The composer runs a named set of service definitions and reports which
//! services it started. Both boot stages go through it: the bootstrap stage
//! for bootstrap and autoformat containers, system-init for the steady-state
//! services.

mod command;

pub use command::CommandComposer;

use crate::config::{CloudConfig, ServiceSet};
use async_trait::async_trait;
use cairn_shared::errors::CairnResult;

#[async_trait]
pub trait ServiceComposer: Send + Sync {
    /// Run `services` as the project `name`, returning the started services.
    async fn run_service_set(
        &self,
        name: &str,
        cfg: &CloudConfig,
        services: &ServiceSet,
    ) -> CairnResult<Vec<String>>;

    /// Run the steady-state system services.
    async fn run_services(&self, cfg: &CloudConfig) -> CairnResult<Vec<String>> {
        self.run_service_set("system", cfg, &cfg.system.services)
            .await
    }
}
