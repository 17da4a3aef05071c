//! Tasks: flush filesystems and announce readiness.

use crate::init::InitCtx;
use crate::pipeline::PipelineTask;
use crate::util::os_type;
use async_trait::async_trait;
use cairn_shared::errors::CairnResult;

/// Flush filesystem buffers before the supervisor takes over.
pub struct SyncTask;

#[async_trait]
impl PipelineTask<InitCtx> for SyncTask {
    async fn run(self: Box<Self>, _ctx: InitCtx) -> CairnResult<()> {
        nix::unistd::sync();
        Ok(())
    }

    fn name(&self) -> &str {
        "sync"
    }
}

pub struct AnnounceTask;

#[async_trait]
impl PipelineTask<InitCtx> for AnnounceTask {
    async fn run(self: Box<Self>, ctx: InitCtx) -> CairnResult<()> {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            os = %os_type(&ctx.layout.os_release),
            "Cairn started"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "announce"
    }
}
