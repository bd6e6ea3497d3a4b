//! Pipeline run orchestration.
//!
//! A run is table-driven: the active subset of the fixed stage list is
//! resolved from `main.steps`, one task per stage is placed in the execution
//! plan in fixed order, and the plan is handed to the sequential pipeline
//! executor. Tracking identity is exported before the first stage spawns and
//! the scoped run directory outlives the whole dispatch, success or failure.

mod tasks;

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, PipelineResult};
use crate::launcher::{ComponentLauncher, ComponentSpec, MlflowLauncher};
use crate::pipeline::{BoxedTask, ExecutionPlan, PipelineBuilder, PipelineExecutor};
use crate::rundir::RunDir;
use crate::steps::{Step, active_steps};
use crate::tracking::TrackingContext;
use std::path::PathBuf;
use std::sync::Arc;

use tasks::{
    BasicCleaningTask, DataCheckTask, DataSplitTask, DownloadTask, TestRegressionModelTask,
    TrainRandomForestTask,
};

/// Shared run context, cloned per task.
pub struct RunContext {
    pub config: PipelineConfig,
    pub tracking: TrackingContext,
    /// Driver working directory at startup; local components live under
    /// `src/` here. Children run inside the run directory, so local URIs are
    /// made absolute against this root.
    pub project_root: PathBuf,
    pub run_dir: PathBuf,
    launcher: Arc<dyn ComponentLauncher>,
}

pub type RunCtx = Arc<RunContext>;

impl RunContext {
    /// URI of a component resolved from `main.components_repository`.
    fn remote_component(&self, name: &str) -> String {
        format!("{}/{}", self.config.main.components_repository, name)
    }

    /// URI of a component shipped with this project under `src/`.
    fn local_component(&self, name: &str) -> String {
        self.project_root.join("src").join(name).display().to_string()
    }

    async fn launch(&self, step: Step, spec: ComponentSpec) -> PipelineResult<()> {
        self.launcher
            .launch(step, &spec, &self.tracking, &self.run_dir)
            .await
    }
}

/// Build the execution plan for the active steps, in fixed order.
fn get_execution_plan(active: &[Step]) -> ExecutionPlan<RunCtx> {
    let tasks: Vec<BoxedTask<RunCtx>> = active
        .iter()
        .map(|step| match step {
            Step::Download => Box::new(DownloadTask) as BoxedTask<RunCtx>,
            Step::BasicCleaning => Box::new(BasicCleaningTask),
            Step::DataCheck => Box::new(DataCheckTask),
            Step::DataSplit => Box::new(DataSplitTask),
            Step::TrainRandomForest => Box::new(TrainRandomForestTask),
            Step::TestRegressionModel => Box::new(TestRegressionModelTask),
        })
        .collect();

    ExecutionPlan::new(tasks)
}

/// Sequences the pipeline stages for one configuration.
///
/// The driver owns no durable state: datasets, models and metrics belong to
/// the tracking service, and a failed run is simply rerun (optionally with
/// `main.steps` restricted to the remaining stages).
pub struct PipelineDriver {
    launcher: Arc<dyn ComponentLauncher>,
}

impl PipelineDriver {
    pub fn new(launcher: Arc<dyn ComponentLauncher>) -> Self {
        Self { launcher }
    }

    /// Driver backed by the `mlflow` CLI.
    pub fn with_mlflow() -> Self {
        Self::new(Arc::new(MlflowLauncher::new()))
    }

    /// Run the active stages to completion, strictly in order.
    ///
    /// The first stage failure aborts the remaining stages and propagates
    /// unmodified; there is no retry and no rollback of artifacts already
    /// registered with the tracking service.
    pub async fn run(&self, config: PipelineConfig) -> PipelineResult<()> {
        config.validate()?;
        let active = active_steps(&config.main.steps)?;

        let tracking = TrackingContext::from(&config.main);
        // Process-wide export must complete before the first stage spawns;
        // each launch also receives the identity explicitly.
        tracking.export();

        let project_root = std::env::current_dir().map_err(|e| {
            PipelineError::Storage(format!("failed to resolve working directory: {}", e))
        })?;
        let run_dir = RunDir::create()?;

        tracing::info!(
            project = %tracking.project,
            run_group = %tracking.run_group,
            steps = ?active.iter().map(Step::as_str).collect::<Vec<_>>(),
            "starting pipeline"
        );

        let ctx: RunCtx = Arc::new(RunContext {
            config,
            tracking,
            project_root,
            run_dir: run_dir.path().to_path_buf(),
            launcher: Arc::clone(&self.launcher),
        });

        let pipeline = PipelineBuilder::from_plan(get_execution_plan(&active));
        let metrics = PipelineExecutor::execute(pipeline, ctx).await?;

        for task in &metrics.tasks {
            tracing::debug!(step = %task.name, duration_ms = task.duration_ms, "step finished");
        }
        tracing::info!(
            total_duration_ms = metrics.total_duration_ms,
            "pipeline complete"
        );

        // run_dir drops here (and on every error path above), removing the
        // scoped directory and the hyperparameter side-file with it.
        Ok(())
    }
}
