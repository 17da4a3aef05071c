//! Boot stage orchestration.
//!
//! ## Architecture
//!
//! Each stage is an ordered, fail-fast pipeline over a shared [`InitContext`]:
//!
//! ```text
//! Bootstrap (temporary engine, always torn down):
//!   1. LoadImages           (stream unstamped image archives)
//!   2. BootstrapContainers  (run bootstrap service set)
//!   3. Autoformat           (format the state disk if it is missing)
//!
//! System-init (long-lived engine):
//!   1. LoadImages           (stream remaining image archives)
//!   2. RunServices          (hand off to steady-state services)
//!   3. Sync                 (flush filesystems)
//!   4. Announce             (log readiness)
//! ```

mod bootstrap;
mod context;
mod sysinit;
pub mod tasks;

pub use bootstrap::{bootstrap, bootstrap_pipeline, launch_options};
pub use context::{InitContext, InitCtx};
pub use sysinit::{sys_init, sys_init_pipeline};
