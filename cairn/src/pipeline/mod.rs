//! Ordered, fail-fast step execution.
//!
//! A boot stage is a list of named steps run one after another against a
//! shared context. The first failing step aborts the stage and its error is
//! handed back to the caller as-is.
//!
//! ```text
//! InitPipeline → Tasks (strict program order)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use cairn::pipeline::{FnTask, InitPipeline, PipelineExecutor};
//!
//! let pipeline = InitPipeline::new()
//!     .step(LoadImagesTask)
//!     .step(FnTask::new("announce", |_ctx| async { Ok(()) }));
//!
//! let metrics = PipelineExecutor::execute(pipeline, ctx).await?;
//! println!("stage took {}ms", metrics.total_duration_ms);
//! ```

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod task;

pub use metrics::{PipelineMetrics, TaskMetrics};
pub use pipeline::{InitPipeline, PipelineExecutor};
pub use task::{BoxedTask, FnTask, PipelineTask};
