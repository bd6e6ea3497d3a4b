//! External component invocation.
//!
//! Stages are implemented by independently packaged MLflow components. The
//! driver never inspects what a component does; it only builds the component's
//! declared parameter set, launches it, and blocks until it exits.
//!
//! `ComponentLauncher` is the seam between dispatch and process spawning so
//! the driver can be exercised without the `mlflow` binary installed.

mod mlflow;

use crate::errors::PipelineResult;
use crate::steps::Step;
use crate::tracking::TrackingContext;
use std::path::Path;

pub use mlflow::MlflowLauncher;

/// How the component's own environment is materialized before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvManager {
    Conda,
    Virtualenv,
    Local,
}

impl EnvManager {
    pub fn as_arg(&self) -> &'static str {
        match self {
            EnvManager::Conda => "conda",
            EnvManager::Virtualenv => "virtualenv",
            EnvManager::Local => "local",
        }
    }
}

/// Declared invocation of one external component.
///
/// `uri` is either a location under `main.components_repository` or a local
/// component directory. Parameters keep their declaration order; the driver
/// passes every value as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub uri: String,
    pub entry_point: String,
    pub env_manager: Option<EnvManager>,
    pub parameters: Vec<(String, String)>,
}

impl ComponentSpec {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            entry_point: "main".to_string(),
            env_manager: None,
            parameters: Vec::new(),
        }
    }

    pub fn env_manager(mut self, env_manager: EnvManager) -> Self {
        self.env_manager = Some(env_manager);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.push((key.into(), value.to_string()));
        self
    }

    /// Look up a declared parameter (test helper for dispatch assertions).
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for launching external components.
///
/// Launchers run the component synchronously from the caller's point of view:
/// `launch` resolves only once the component process has exited.
#[async_trait::async_trait]
pub trait ComponentLauncher: Send + Sync {
    /// Launch the component for `step` and block until it completes.
    ///
    /// # Errors
    /// - `Launch` if the process could not be started
    /// - `Component` if the process exited unsuccessfully
    async fn launch(
        &self,
        step: Step,
        spec: &ComponentSpec,
        tracking: &TrackingContext,
        run_dir: &Path,
    ) -> PipelineResult<()>;
}
