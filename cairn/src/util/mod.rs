mod device;
mod os;
mod process;
mod text;

pub use device::{DeviceResolver, SysDeviceResolver};
pub use os::os_type;
pub use process::{is_process_alive, terminate};
pub use text::{get_value, kv_pairs_to_map, map_to_kv_pairs};

use cairn_shared::errors::{CairnError, CairnResult};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "init.log";

/// Install the global tracing subscriber.
///
/// With a log directory, output goes to `{log_dir}/init.log`; otherwise to
/// stderr. The filter comes from `RUST_LOG` and defaults to `info`. The
/// returned guard must stay alive for buffered lines to be flushed.
pub fn init_logging(log_dir: Option<&Path>) -> CairnResult<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| CairnError::Config(format!("invalid log filter: {e}")))?;

    let (non_blocking, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                CairnError::Storage(format!(
                    "failed to create log dir {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE)
                .build(dir)
                .map_err(|e| {
                    CairnError::Storage(format!(
                        "failed to open {} in {}: {}",
                        LOG_FILE,
                        dir.display(),
                        e
                    ))
                })?;
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    register_to_tracing(non_blocking, env_filter);
    Ok(guard)
}

fn register_to_tracing(non_blocking: NonBlocking, env_filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false),
        )
        .try_init();
}
