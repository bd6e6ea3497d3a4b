//! Sequential pipeline executor.
//!
//! Provides a table-driven executor that runs an ordered list of tasks, one
//! fully completing before the next begins.

use super::metrics::{PipelineMetrics, TaskMetrics};
use super::task::BoxedTask;
use crate::errors::PipelineResult;
use std::time::Instant;

pub struct ExecutionPlan<Ctx> {
    tasks: Vec<BoxedTask<Ctx>>,
}

impl<Ctx> ExecutionPlan<Ctx> {
    pub fn new(tasks: Vec<BoxedTask<Ctx>>) -> Self {
        Self { tasks }
    }

    pub fn tasks(self) -> Vec<BoxedTask<Ctx>> {
        self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub struct Pipeline<Ctx> {
    tasks: Vec<BoxedTask<Ctx>>,
}

impl<Ctx> Pipeline<Ctx> {
    pub fn new(tasks: Vec<BoxedTask<Ctx>>) -> Self {
        Self { tasks }
    }
}

pub struct PipelineBuilder;

impl PipelineBuilder {
    pub fn from_plan<Ctx>(plan: ExecutionPlan<Ctx>) -> Pipeline<Ctx> {
        Pipeline::new(plan.tasks())
    }
}

/// Pipeline executor framework.
///
/// This provides the generic infrastructure for executing a table-driven
/// pipeline. The actual work is provided by task implementations.
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Execute a pipeline.
    ///
    /// This is the core execution loop. Tasks run strictly in order; the
    /// first task error aborts the remaining tasks and propagates unmodified.
    ///
    /// Generic over:
    /// - `Ctx`: Shared pipeline context, cloned per task
    pub async fn execute<Ctx>(pipeline: Pipeline<Ctx>, ctx: Ctx) -> PipelineResult<PipelineMetrics>
    where
        Ctx: Clone,
    {
        let total_start = Instant::now();
        let mut task_metrics = Vec::new();

        for task in pipeline.tasks {
            let name = task.name().to_string();
            let task_start = Instant::now();

            tracing::info!(step = %name, "running pipeline step");
            task.run(ctx.clone()).await?;

            task_metrics.push(TaskMetrics {
                name,
                duration_ms: task_start.elapsed().as_millis(),
            });
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
    use crate::errors::PipelineError;
    use crate::pipeline::PipelineTask;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<&'static str>>>;

    struct Record(&'static str);

    #[async_trait]
    impl PipelineTask<Log> for Record {
        async fn run(self: Box<Self>, ctx: Log) -> PipelineResult<()> {
            ctx.lock().unwrap().push(self.0);
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    struct Fail;

    #[async_trait]
    impl PipelineTask<Log> for Fail {
        async fn run(self: Box<Self>, _ctx: Log) -> PipelineResult<()> {
            Err(PipelineError::Internal("boom".into()))
        }

        fn name(&self) -> &str {
            "fail"
        }
    }

    #[tokio::test]
    async fn runs_tasks_in_order() {
        let plan = ExecutionPlan::new(vec![
            Box::new(Record("a")) as BoxedTask<Log>,
            Box::new(Record("b")),
            Box::new(Record("c")),
        ]);
        let log: Log = Arc::new(Mutex::new(Vec::new()));

        let metrics = PipelineExecutor::execute(PipelineBuilder::from_plan(plan), log.clone())
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(metrics.tasks.len(), 3);
        assert!(metrics.task_duration_ms("b").is_some());
    }

    #[tokio::test]
    async fn first_failure_aborts_the_rest() {
        let plan = ExecutionPlan::new(vec![
            Box::new(Record("a")) as BoxedTask<Log>,
            Box::new(Fail),
            Box::new(Record("c")),
        ]);
        let log: Log = Arc::new(Mutex::new(Vec::new()));

        let err = PipelineExecutor::execute(PipelineBuilder::from_plan(plan), log.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Internal(_)));
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }
}
