//! Sequential pipeline executor.

use super::metrics::{PipelineMetrics, TaskMetrics};
use super::task::{BoxedTask, PipelineTask};
use cairn_shared::errors::CairnResult;
use std::time::Instant;

/// Ordered list of boot steps. Identity of a step is its position.
pub struct InitPipeline<Ctx> {
    tasks: Vec<BoxedTask<Ctx>>,
}

impl<Ctx> Default for InitPipeline<Ctx> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<Ctx> InitPipeline<Ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the pipeline.
    pub fn step(mut self, task: impl PipelineTask<Ctx> + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }
}

/// Pipeline executor.
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Execute a pipeline.
    ///
    /// Steps run strictly in order. The first error stops the pipeline and
    /// is returned unchanged; later steps never run.
    pub async fn execute<Ctx>(pipeline: InitPipeline<Ctx>, ctx: Ctx) -> CairnResult<PipelineMetrics>
    where
        Ctx: Clone,
    {
        let total_start = Instant::now();
        let mut task_metrics = Vec::with_capacity(pipeline.tasks.len());

        for task in pipeline.tasks {
            let name = task.name().to_string();
            let task_start = Instant::now();
            tracing::debug!(task = %name, "Running init step");

            task.run(ctx.clone()).await.inspect_err(|e| {
                tracing::error!(task = %name, error = %e, "Init step failed");
            })?;

            let duration_ms = task_start.elapsed().as_millis();
            tracing::debug!(task = %name, duration_ms, "Init step finished");
            task_metrics.push(TaskMetrics { name, duration_ms });
        }

        Ok(PipelineMetrics {
            total_duration_ms: total_start.elapsed().as_millis(),
            tasks: task_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FnTask;
    use cairn_shared::errors::CairnError;
    use futures::future::{Ready, ready};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<&'static str>>>;
    type Outcome = Ready<CairnResult<()>>;

    fn record(name: &'static str) -> FnTask<impl FnOnce(Log) -> Outcome + Send + Sync> {
        FnTask::new(name, move |log: Log| {
            log.lock().unwrap().push(name);
            ready(Ok(()))
        })
    }

    fn fail(name: &'static str) -> FnTask<impl FnOnce(Log) -> Outcome + Send + Sync> {
        FnTask::new(name, move |log: Log| {
            log.lock().unwrap().push(name);
            ready(Err(CairnError::Step(format!("{name} exploded"))))
        })
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let log: Log = Arc::default();
        let pipeline: InitPipeline<Log> = InitPipeline::new()
            .step(record("first"))
            .step(record("second"))
            .step(record("third"));

        let metrics = PipelineExecutor::execute(pipeline, log.clone())
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert_eq!(metrics.task_names(), vec!["first", "second", "third"]);
        assert!(metrics.task_duration_ms("second").is_some());
        assert!(metrics.task_duration_ms("missing").is_none());
    }

    #[tokio::test]
    async fn test_first_failure_stops_pipeline() {
        let log: Log = Arc::default();
        let pipeline: InitPipeline<Log> = InitPipeline::new()
            .step(record("ok-1"))
            .step(fail("broken"))
            .step(record("ok-2"));

        let err = PipelineExecutor::execute(pipeline, log.clone())
            .await
            .unwrap_err();

        assert_eq!(*log.lock().unwrap(), vec!["ok-1", "broken"]);
        match err {
            CairnError::Step(msg) => assert_eq!(msg, "broken exploded"),
            other => panic!("expected the step error unchanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_pipeline_succeeds() {
        let pipeline: InitPipeline<Log> = InitPipeline::new();
        assert!(pipeline.is_empty());
        let metrics = PipelineExecutor::execute(pipeline, Log::default())
            .await
            .unwrap();
        assert!(metrics.tasks.is_empty());
    }

    #[test]
    fn test_task_names_follow_insertion_order() {
        let pipeline: InitPipeline<Log> = InitPipeline::new().step(record("a")).step(fail("b"));
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.task_names(), vec!["a", "b"]);
    }
}
