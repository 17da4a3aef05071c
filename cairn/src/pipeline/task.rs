//! Generic task trait for pipeline execution.

use async_trait::async_trait;
use cairn_shared::errors::CairnResult;
use std::future::Future;

/// A single named step of a boot stage.
///
/// Tasks run with a shared context, which is cloned per task. Use an `Arc`
/// context and interior mutability for anything a later step must see.
#[async_trait]
pub trait PipelineTask<Ctx>: Send + Sync {
    /// Execute the task with the shared pipeline context.
    async fn run(self: Box<Self>, ctx: Ctx) -> CairnResult<()>;

    /// Get human-readable task name for logging.
    fn name(&self) -> &str;
}

pub type BoxedTask<Ctx> = Box<dyn PipelineTask<Ctx>>;

/// Adapter turning an async closure into a named task.
pub struct FnTask<F> {
    name: String,
    func: F,
}

impl<F> FnTask<F> {
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<Ctx, F, Fut> PipelineTask<Ctx> for FnTask<F>
where
    Ctx: Send + 'static,
    F: FnOnce(Ctx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CairnResult<()>> + Send + 'static,
{
    async fn run(self: Box<Self>, ctx: Ctx) -> CairnResult<()> {
        (self.func)(ctx).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
