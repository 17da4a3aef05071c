//! System-init stage: load remaining images and hand off to services.

use super::InitCtx;
use super::tasks::{AnnounceTask, LoadImagesTask, RunServicesTask, SyncTask};
use crate::pipeline::{InitPipeline, PipelineExecutor, PipelineMetrics};
use cairn_shared::errors::CairnResult;

pub fn sys_init_pipeline() -> InitPipeline<InitCtx> {
    InitPipeline::new()
        .step(LoadImagesTask)
        .step(RunServicesTask)
        .step(SyncTask)
        .step(AnnounceTask)
}

/// Run the system-init stage against the long-lived engine.
pub async fn sys_init(ctx: InitCtx) -> CairnResult<PipelineMetrics> {
    PipelineExecutor::execute(sys_init_pipeline(), ctx).await
}
