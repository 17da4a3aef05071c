//! Tasks: hand service sets to the composer.

use crate::init::InitCtx;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use cairn_shared::errors::CairnResult;

/// Run the bootstrap containers under the bootstrap engine.
pub struct BootstrapContainersTask;

#[async_trait]
impl PipelineTask<InitCtx> for BootstrapContainersTask {
    async fn run(self: Box<Self>, ctx: InitCtx) -> CairnResult<()> {
        tracing::info!("Running bootstrap services");
        ctx.composer
            .run_service_set("bootstrap", &ctx.config, &ctx.config.system.bootstrap_containers)
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "bootstrap_containers"
    }
}

/// Hand off to the steady-state services.
pub struct RunServicesTask;

#[async_trait]
impl PipelineTask<InitCtx> for RunServicesTask {
    async fn run(self: Box<Self>, ctx: InitCtx) -> CairnResult<()> {
        let started = ctx.composer.run_services(&ctx.config).await?;
        tracing::info!(count = started.len(), "System services started");
        Ok(())
    }

    fn name(&self) -> &str {
        "run_services"
    }
}
