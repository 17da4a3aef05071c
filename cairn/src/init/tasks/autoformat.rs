//! Task: Autoformat - format the state disk when it does not exist yet.

use crate::config::{CloudConfig, ServiceSet};
use crate::init::InitCtx;
use crate::pipeline::PipelineTask;
use async_trait::async_trait;
use cairn_shared::errors::CairnResult;

const AUTOFORMAT_SERVICE: &str = "autoformat";

/// Autoformat services with the format targets in their environment.
///
/// Works on a copy; the loaded configuration is left untouched.
pub fn autoformat_services(cfg: &CloudConfig) -> ServiceSet {
    let state = &cfg.system.state;
    let mut services = cfg.system.autoformat.clone();

    if let Some(service) = services.get_mut(AUTOFORMAT_SERVICE) {
        service.environment = vec![
            format!("AUTOFORMAT={}", state.autoformat.join(" ")),
            format!("FORMATZERO={}", state.formatzero),
        ];
    }
    services
}

pub struct AutoformatTask;

#[async_trait]
impl PipelineTask<InitCtx> for AutoformatTask {
    async fn run(self: Box<Self>, ctx: InitCtx) -> CairnResult<()> {
        let state = &ctx.config.system.state;

        if state.autoformat.is_empty() {
            tracing::debug!("No autoformat targets configured");
            return Ok(());
        }
        if let Some(device) = ctx.devices.resolve(&state.dev) {
            tracing::debug!(dev = %state.dev, device = %device.display(), "State disk present, not formatting");
            return Ok(());
        }

        tracing::info!(targets = ?state.autoformat, "Running autoformat services");
        ctx.composer
            .run_service_set(AUTOFORMAT_SERVICE, &ctx.config, &autoformat_services(&ctx.config))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "autoformat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::init::InitContext;
    use crate::init::tasks::fakes::{RecordingComposer, StaticDevices};
    use crate::layout::BootLayout;
    use crate::util::get_value;
    use std::sync::Arc;

    fn config(targets: &[&str]) -> CloudConfig {
        let mut cfg = CloudConfig::default();
        cfg.system.state.dev = "LABEL=CAIRN_STATE".into();
        cfg.system.state.autoformat = targets.iter().map(|t| t.to_string()).collect();
        cfg.system.state.formatzero = true;
        cfg.system.autoformat.insert(
            AUTOFORMAT_SERVICE.into(),
            ServiceConfig {
                image: "cairn/autoformat".into(),
                environment: vec!["STALE=1".into()],
                ..Default::default()
            },
        );
        cfg
    }

    fn ctx(cfg: CloudConfig, composer: Arc<RecordingComposer>, known: &[&str]) -> InitCtx {
        let devices = StaticDevices {
            known: known.iter().map(|d| d.to_string()).collect(),
        };
        InitContext::new(cfg, BootLayout::rooted_at("/nonexistent"))
            .with_composer(composer)
            .with_device_resolver(Arc::new(devices))
            .into_shared()
    }

    #[test]
    fn test_environment_encodes_targets() {
        let cfg = config(&["/dev/sda", "/dev/vda"]);
        let services = autoformat_services(&cfg);
        let env = &services[AUTOFORMAT_SERVICE].environment;

        assert_eq!(get_value(env, "AUTOFORMAT"), Some("/dev/sda /dev/vda"));
        assert_eq!(get_value(env, "FORMATZERO"), Some("true"));
        assert_eq!(get_value(env, "STALE"), None);
        // The loaded configuration is not mutated
        assert_eq!(cfg.system.autoformat[AUTOFORMAT_SERVICE].environment, vec!["STALE=1"]);
    }

    #[tokio::test]
    async fn test_no_targets_is_noop() {
        let composer = Arc::new(RecordingComposer::default());
        Box::new(AutoformatTask)
            .run(ctx(config(&[]), composer.clone(), &[]))
            .await
            .unwrap();
        assert!(composer.projects().is_empty());
    }

    #[tokio::test]
    async fn test_existing_state_disk_is_noop() {
        let composer = Arc::new(RecordingComposer::default());
        Box::new(AutoformatTask)
            .run(ctx(config(&["/dev/sda"]), composer.clone(), &["LABEL=CAIRN_STATE"]))
            .await
            .unwrap();
        assert!(composer.projects().is_empty());
    }

    #[tokio::test]
    async fn test_missing_state_disk_runs_autoformat() {
        let composer = Arc::new(RecordingComposer::default());
        Box::new(AutoformatTask)
            .run(ctx(config(&["/dev/sda"]), composer.clone(), &[]))
            .await
            .unwrap();

        let calls = composer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "autoformat");
        let env = &calls[0].1[AUTOFORMAT_SERVICE].environment;
        assert_eq!(get_value(env, "AUTOFORMAT"), Some("/dev/sda"));
    }

    #[tokio::test]
    async fn test_composer_failure_is_returned() {
        let composer = Arc::new(RecordingComposer {
            fail_on: Some("autoformat".into()),
            ..Default::default()
        });
        let err = Box::new(AutoformatTask)
            .run(ctx(config(&["/dev/sda"]), composer, &[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("autoformat services failed"));
    }
}
