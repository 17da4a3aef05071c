//! Bootstrap stage: run setup work under a throwaway engine.

use super::InitCtx;
use super::tasks::{AutoformatTask, BootstrapContainersTask, LoadImagesTask};
use crate::config::CloudConfig;
use crate::engine::{EngineController, EngineGuard, LaunchOptions};
use crate::layout::BootLayout;
use crate::pipeline::{InitPipeline, PipelineExecutor, PipelineMetrics};
use cairn_shared::errors::CairnResult;

/// Launch options for the bootstrap engine.
pub fn launch_options(cfg: &CloudConfig, layout: &BootLayout) -> LaunchOptions {
    let engine = &cfg.system.bootstrap_engine;
    let mut args = engine.args.clone();
    args.extend([
        "--host".to_string(),
        layout.engine_host.clone(),
        "--data-root".to_string(),
        layout.engine_home.display().to_string(),
    ]);

    LaunchOptions {
        bin: layout.engine_bin.clone(),
        args,
        home: layout.engine_home.clone(),
        host: Some(layout.engine_host.clone()),
        env: engine.environment.clone(),
        ..Default::default()
    }
    .for_bootstrap()
}

pub fn bootstrap_pipeline() -> InitPipeline<InitCtx> {
    InitPipeline::new()
        .step(LoadImagesTask)
        .step(BootstrapContainersTask)
        .step(AutoformatTask)
}

/// Run the bootstrap stage.
///
/// The engine is stopped and its state removed on every exit path once it
/// has started. Image stamps are cleared afterwards, so system-init loads into
/// its own engine from scratch.
pub async fn bootstrap(ctx: InitCtx, controller: &dyn EngineController) -> CairnResult<PipelineMetrics> {
    tracing::info!("Launching bootstrap engine");
    let handle = controller
        .start(&launch_options(&ctx.config, &ctx.layout))
        .await?;

    let result = EngineGuard::run(
        handle,
        PipelineExecutor::execute(bootstrap_pipeline(), ctx.clone()),
    )
    .await;

    match (result, ctx.stamps.clear()) {
        (Ok(metrics), Ok(())) => {
            tracing::info!(duration_ms = metrics.total_duration_ms, "Bootstrap finished");
            Ok(metrics)
        }
        (Ok(_), Err(e)) => Err(e),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(e)) => {
            tracing::warn!(error = %e, "Failed to clear image stamps after bootstrap failure");
            Err(primary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CloudConfig, EngineConfig};

    #[test]
    fn test_launch_options_from_config() {
        let mut cfg = CloudConfig::default();
        cfg.system.bootstrap_engine = EngineConfig {
            args: vec!["daemon".into()],
            environment: vec!["DEBUG=1".into()],
        };
        let layout = BootLayout::rooted_at("/boot");

        let options = launch_options(&cfg, &layout);

        assert!(options.fork);
        assert!(options.no_log);
        assert_eq!(options.bin, layout.engine_bin);
        assert_eq!(options.home, layout.engine_home);
        assert_eq!(
            options.args,
            vec![
                "daemon",
                "--host",
                "unix:///boot/engine.sock",
                "--data-root",
                "/boot/engine"
            ]
        );
        assert_eq!(options.env, vec!["DEBUG=1"]);
    }

    #[test]
    fn test_bootstrap_step_order() {
        assert_eq!(
            bootstrap_pipeline().task_names(),
            vec!["load_images", "bootstrap_containers", "autoformat"]
        );
    }
}
