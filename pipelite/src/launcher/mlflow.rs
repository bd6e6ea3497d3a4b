//! Subprocess launcher for `mlflow run`.

use super::{ComponentLauncher, ComponentSpec};
use crate::errors::{PipelineError, PipelineResult};
use crate::steps::Step;
use crate::tracking::TrackingContext;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Launches components through the `mlflow` CLI.
///
/// Each launch becomes `mlflow run <uri> --entry-point <ep> [--env-manager x]
/// -P k=v ...`, executed inside the run directory with the tracking identity
/// applied to the child environment. Stdio is inherited: the component's own
/// output is the only diagnostic the operator gets, and the driver does not
/// capture or rewrite it.
pub struct MlflowLauncher {
    binary: PathBuf,
}

impl MlflowLauncher {
    pub fn new() -> Self {
        Self::with_binary("mlflow")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_command(
        &self,
        spec: &ComponentSpec,
        tracking: &TrackingContext,
        run_dir: &Path,
    ) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("run")
            .arg(&spec.uri)
            .arg("--entry-point")
            .arg(&spec.entry_point);

        if let Some(env_manager) = spec.env_manager {
            cmd.arg("--env-manager").arg(env_manager.as_arg());
        }

        for (key, value) in &spec.parameters {
            cmd.arg("-P").arg(format!("{}={}", key, value));
        }

        cmd.current_dir(run_dir);
        cmd.envs(tracking.env_vars());
        cmd
    }
}

impl Default for MlflowLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ComponentLauncher for MlflowLauncher {
    async fn launch(
        &self,
        step: Step,
        spec: &ComponentSpec,
        tracking: &TrackingContext,
        run_dir: &Path,
    ) -> PipelineResult<()> {
        let mut cmd = self.build_command(spec, tracking, run_dir);

        tracing::debug!(step = %step, uri = %spec.uri, "launching component");

        let status = cmd.status().await.map_err(|e| {
            let err = PipelineError::Launch {
                step: step.to_string(),
                reason: format!("{}: {}", self.binary.display(), e),
            };
            tracing::error!("{}", err);
            err
        })?;

        if !status.success() {
            return Err(PipelineError::Component {
                step: step.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::EnvManager;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn builds_full_mlflow_invocation() {
        let launcher = MlflowLauncher::new();
        let spec = ComponentSpec::new("https://example.com/components#get_data")
            .env_manager(EnvManager::Conda)
            .param("sample", "sample1.csv")
            .param("artifact_type", "raw_data");
        let tracking = TrackingContext::new("proj", "group");
        let run_dir = std::env::temp_dir();

        let cmd = launcher.build_command(&spec, &tracking, &run_dir);

        assert_eq!(
            args_of(&cmd),
            vec![
                "run",
                "https://example.com/components#get_data",
                "--entry-point",
                "main",
                "--env-manager",
                "conda",
                "-P",
                "sample=sample1.csv",
                "-P",
                "artifact_type=raw_data",
            ]
        );
        assert_eq!(cmd.as_std().get_current_dir(), Some(run_dir.as_path()));

        let envs: Vec<_> = cmd
            .as_std()
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.map(|v| v.to_string_lossy().into_owned()),
                )
            })
            .collect();
        assert!(envs.contains(&("WANDB_PROJECT".into(), Some("proj".into()))));
        assert!(envs.contains(&("WANDB_RUN_GROUP".into(), Some("group".into()))));
    }

    #[test]
    fn omits_env_manager_when_unset() {
        let launcher = MlflowLauncher::new();
        let spec = ComponentSpec::new("./train_val_test_split").param("test_size", "0.2");
        let tracking = TrackingContext::new("p", "g");

        let cmd = launcher.build_command(&spec, &tracking, &std::env::temp_dir());
        assert!(!args_of(&cmd).contains(&"--env-manager".to_string()));
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let launcher = MlflowLauncher::with_binary("/nonexistent/mlflow-binary");
        let spec = ComponentSpec::new("whatever");
        let tracking = TrackingContext::new("p", "g");

        let err = launcher
            .launch(Step::Download, &spec, &tracking, &std::env::temp_dir())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Launch { step, .. } if step == "download"));
    }
}
