//! One pipeline task per stage.
//!
//! Each task builds its component's declared parameter mapping from literal
//! defaults and configuration values, then delegates to the launcher. Tasks
//! never consume component output; artifact names (`name:tag`) are the only
//! thing flowing between stages, resolved by the tracking service.

use super::RunCtx;
use crate::errors::{PipelineError, PipelineResult};
use crate::launcher::{ComponentSpec, EnvManager};
use crate::pipeline::PipelineTask;
use crate::steps::Step;
use async_trait::async_trait;

// Literal per-stage defaults, matching what the components were tuned for.
// Deliberately not part of the configuration surface.
const MIN_PRICE: &str = "10";
const MAX_PRICE: &str = "350";
const KL_THRESHOLD: &str = "0.2";
const TEST_SIZE: &str = "0.2";
const VAL_SIZE: &str = "0.2";
const RANDOM_SEED: &str = "42";
const STRATIFY_BY: &str = "neighbourhood_group";
const MAX_TFIDF_FEATURES: &str = "5";

const RAW_ARTIFACT: &str = "sample.csv";
const CLEAN_ARTIFACT: &str = "clean_sample.csv";
const MODEL_EXPORT: &str = "random_forest_export";

pub struct DownloadTask;

#[async_trait]
impl PipelineTask<RunCtx> for DownloadTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        let spec = ComponentSpec::new(ctx.remote_component("get_data"))
            .env_manager(EnvManager::Conda)
            .param("sample", &ctx.config.etl.sample)
            .param("artifact_name", RAW_ARTIFACT)
            .param("artifact_type", "raw_data")
            .param("artifact_description", "Raw file as downloaded");

        ctx.launch(Step::Download, spec).await
    }

    fn name(&self) -> &str {
        Step::Download.as_str()
    }
}

pub struct BasicCleaningTask;

#[async_trait]
impl PipelineTask<RunCtx> for BasicCleaningTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        let spec = ComponentSpec::new(ctx.local_component("basic_cleaning"))
            .env_manager(EnvManager::Conda)
            .param("input_artifact", format!("{}:latest", RAW_ARTIFACT))
            .param("output_artifact", CLEAN_ARTIFACT)
            .param("output_type", "clean_sample")
            .param(
                "output_description",
                "Data cleaned by removing outliers and invalid entries",
            )
            .param("min_price", MIN_PRICE)
            .param("max_price", MAX_PRICE);

        ctx.launch(Step::BasicCleaning, spec).await
    }

    fn name(&self) -> &str {
        Step::BasicCleaning.as_str()
    }
}

pub struct DataCheckTask;

#[async_trait]
impl PipelineTask<RunCtx> for DataCheckTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        // `ref` pins the reference dataset the checks compare against. If
        // basic_cleaning never produced its artifact, resolution fails inside
        // the component and that failure is propagated, not masked.
        let spec = ComponentSpec::new(ctx.local_component("data_check"))
            .env_manager(EnvManager::Conda)
            .param("csv", format!("{}:latest", CLEAN_ARTIFACT))
            .param("ref", format!("{}:reference", CLEAN_ARTIFACT))
            .param("kl_threshold", KL_THRESHOLD)
            .param("min_price", MIN_PRICE)
            .param("max_price", MAX_PRICE);

        ctx.launch(Step::DataCheck, spec).await
    }

    fn name(&self) -> &str {
        Step::DataCheck.as_str()
    }
}

pub struct DataSplitTask;

#[async_trait]
impl PipelineTask<RunCtx> for DataSplitTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        let spec = ComponentSpec::new(ctx.remote_component("train_val_test_split"))
            .param("input", format!("{}:latest", CLEAN_ARTIFACT))
            .param("test_size", TEST_SIZE)
            .param("random_seed", RANDOM_SEED)
            .param("stratify_by", STRATIFY_BY);

        ctx.launch(Step::DataSplit, spec).await
    }

    fn name(&self) -> &str {
        Step::DataSplit.as_str()
    }
}

pub struct TrainRandomForestTask;

#[async_trait]
impl PipelineTask<RunCtx> for TrainRandomForestTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        // The training component takes its hyperparameters as a JSON file
        // path. The side-file lives in the run directory, so it exists only
        // for the duration of the run.
        let rf_config = ctx.run_dir.join("rf_config.json");
        let contents = serde_json::to_string(&ctx.config.modeling.random_forest)
            .map_err(|e| PipelineError::Internal(format!("serializing rf_config: {}", e)))?;
        std::fs::write(&rf_config, contents).map_err(|e| {
            PipelineError::Storage(format!(
                "failed to write {}: {}",
                rf_config.display(),
                e
            ))
        })?;

        let spec = ComponentSpec::new(ctx.local_component("train_random_forest"))
            .env_manager(EnvManager::Conda)
            .param("trainval_artifact", "trainval_data.csv:latest")
            .param("val_size", VAL_SIZE)
            .param("random_seed", RANDOM_SEED)
            .param("stratify_by", STRATIFY_BY)
            .param("rf_config", rf_config.display())
            .param("max_tfidf_features", MAX_TFIDF_FEATURES)
            .param("output_artifact", MODEL_EXPORT);

        ctx.launch(Step::TrainRandomForest, spec).await
    }

    fn name(&self) -> &str {
        Step::TrainRandomForest.as_str()
    }
}

pub struct TestRegressionModelTask;

#[async_trait]
impl PipelineTask<RunCtx> for TestRegressionModelTask {
    async fn run(self: Box<Self>, ctx: RunCtx) -> PipelineResult<()> {
        // Runs against the export promoted to `prod`; that promotion happens
        // in the tracking service, never here.
        let spec = ComponentSpec::new(ctx.remote_component("test_regression_model"))
            .env_manager(EnvManager::Conda)
            .param("mlflow_model", format!("{}:prod", MODEL_EXPORT))
            .param("test_dataset", "test_data.csv:latest");

        ctx.launch(Step::TestRegressionModel, spec).await
    }

    fn name(&self) -> &str {
        Step::TestRegressionModel.as_str()
    }
}
