//! `cairn-init`: runs the boot stages.

use std::path::PathBuf;

use cairn::config::{CloudConfig, ConfigLoader};
use cairn::engine::ProcessEngineController;
use cairn::init::{self, InitContext};
use cairn::resource::ResourceLoader;
use cairn::util::init_logging;
use cairn::{CairnResult, InitOptions};
use cairn_shared::constants::env;
use clap::{Parser, Subcommand};

/// Early-boot orchestrator
#[derive(Parser, Debug)]
#[command(author, version, about = "Cairn early-boot orchestrator")]
struct InitArgs {
    #[command(subcommand)]
    command: Option<Stage>,

    /// Directory scanned for image archives
    #[arg(long, env = env::IMAGES_DIR)]
    images_dir: Option<PathBuf>,

    /// Filename pattern of image archives
    #[arg(long, env = env::IMAGES_PATTERN)]
    images_pattern: Option<String>,

    /// Directory holding image load stamps
    #[arg(long, env = env::STAMP_DIR)]
    stamp_dir: Option<PathBuf>,

    /// System-state directory of the bootstrap engine
    #[arg(long, env = env::ENGINE_HOME)]
    engine_home: Option<PathBuf>,

    #[arg(long, env = env::ENGINE_BIN)]
    engine_bin: Option<PathBuf>,

    /// Socket the engine serves on, e.g. unix:///var/run/system-docker.sock
    #[arg(long, env = env::ENGINE_HOST)]
    engine_host: Option<String>,

    #[arg(long, env = env::COMPOSE_BIN)]
    compose_bin: Option<PathBuf>,

    /// Device root used to resolve LABEL= and UUID= specs
    #[arg(long, env = env::DEV_ROOT)]
    dev_root: Option<PathBuf>,

    #[arg(long, env = env::LOG_DIR)]
    log_dir: Option<PathBuf>,

    /// Log to stderr instead of the log directory
    #[arg(long)]
    log_stderr: bool,

    /// Configuration layers, lowest precedence first (replaces the defaults)
    #[arg(long = "config", env = env::CONFIG, value_delimiter = ',')]
    config: Vec<String>,

    /// Allow remote configuration and service indexes
    #[arg(long, env = env::NETWORK)]
    network: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Run the bootstrap stage, then system-init (default)
    Init,
    /// Run only the bootstrap stage
    Bootstrap,
    /// Run only the system-init stage
    Sysinit,
    /// List services offered by the configured repositories
    Services,
}

impl InitArgs {
    fn into_options(self) -> InitOptions {
        let mut options = InitOptions::default();
        let layout = &mut options.layout;

        if let Some(v) = self.images_dir {
            layout.images_dir = v;
        }
        if let Some(v) = self.images_pattern {
            layout.images_pattern = v;
        }
        if let Some(v) = self.stamp_dir {
            layout.stamp_dir = v;
        }
        if let Some(v) = self.engine_home {
            layout.engine_home = v;
        }
        if let Some(v) = self.engine_bin {
            layout.engine_bin = v;
        }
        if let Some(v) = self.engine_host {
            layout.engine_host = v;
        }
        if let Some(v) = self.compose_bin {
            layout.compose_bin = v;
        }
        if let Some(v) = self.dev_root {
            layout.dev_root = v;
        }

        if self.log_stderr {
            options.log_dir = None;
        } else if let Some(v) = self.log_dir {
            options.log_dir = Some(v);
        }
        if !self.config.is_empty() {
            options = options.with_config_locations(&self.config);
        }
        options.network = self.network;
        options
    }
}

async fn load_config(resources: &ResourceLoader, options: &InitOptions) -> CairnResult<CloudConfig> {
    ConfigLoader::new(resources)
        .with_network(options.network)
        .load(&options.config_layers)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))
}

async fn run_bootstrap(resources: &ResourceLoader, options: &InitOptions) -> CairnResult<()> {
    let config = load_config(resources, options).await?;
    let ctx = InitContext::new(config, options.layout.clone()).into_shared();
    init::bootstrap(ctx, &ProcessEngineController::new()).await?;
    Ok(())
}

async fn run_sysinit(resources: &ResourceLoader, options: &InitOptions) -> CairnResult<()> {
    // Reloaded: the state disk may only exist after bootstrap.
    let config = load_config(resources, options).await?;
    let ctx = InitContext::new(config, options.layout.clone()).into_shared();
    init::sys_init(ctx).await?;
    Ok(())
}

async fn list_services(resources: &ResourceLoader, options: &InitOptions) -> CairnResult<()> {
    let config = load_config(resources, options).await?;
    for service in resources.fetch_services(&config.repository_urls()).await {
        println!("{service}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> CairnResult<()> {
    let args = InitArgs::parse();
    let stage = args.command.unwrap_or(Stage::Init);
    let options = args.into_options();

    // Keep guard alive until end of main to ensure logs are written
    let _log_guard = init_logging(options.log_dir.as_deref())?;
    tracing::info!(stage = ?stage, "cairn-init starting");

    let resources = ResourceLoader::new()?;
    run_stage(stage, &resources, &options).await
}

async fn run_stage(stage: Stage, resources: &ResourceLoader, options: &InitOptions) -> CairnResult<()> {
    let result = match stage {
        Stage::Init => match run_bootstrap(resources, options).await {
            Ok(()) => run_sysinit(resources, options).await,
            Err(e) => Err(e),
        },
        Stage::Bootstrap => run_bootstrap(resources, options).await,
        Stage::Sysinit => run_sysinit(resources, options).await,
        Stage::Services => list_services(resources, options).await,
    };

    if let Err(e) = &result {
        tracing::error!(stage = ?stage, error = %e, "Boot stage failed");
    }
    result
}
