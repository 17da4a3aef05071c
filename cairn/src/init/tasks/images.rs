//! Task: Load images - stream unstamped image archives into the engine.

use crate::images::load_images;
use crate::init::InitCtx;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use cairn_shared::errors::CairnResult;

pub struct LoadImagesTask;

#[async_trait]
impl PipelineTask<InitCtx> for LoadImagesTask {
    async fn run(self: Box<Self>, ctx: InitCtx) -> CairnResult<()> {
        let layout = &ctx.layout;
        let loaded = load_images(
            ctx.images.as_ref(),
            &ctx.stamps,
            &layout.images_dir,
            &layout.images_pattern,
        )
        .await?;

        tracing::debug!(loaded, dir = %layout.images_dir.display(), "Image loading finished");
        Ok(())
    }

    fn name(&self) -> &str {
        "load_images"
    }
}
