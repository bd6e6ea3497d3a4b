//! Tracking-service identity for a pipeline run.

use crate::config::MainConfig;

/// Environment variable the tracking service reads for the project name.
pub const PROJECT_ENV: &str = "WANDB_PROJECT";
/// Environment variable the tracking service reads for the run group.
pub const RUN_GROUP_ENV: &str = "WANDB_RUN_GROUP";

/// Project and run-group identity every component run is registered under.
///
/// The identity is exported process-wide once, before any stage spawns, and is
/// additionally applied to each child process environment explicitly so that
/// no component invocation depends on ambient process state alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingContext {
    pub project: String,
    pub run_group: String,
}

impl TrackingContext {
    pub fn new(project: impl Into<String>, run_group: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            run_group: run_group.into(),
        }
    }

    /// The environment pairs to apply to a child process.
    pub fn env_vars(&self) -> [(&'static str, &str); 2] {
        [
            (PROJECT_ENV, self.project.as_str()),
            (RUN_GROUP_ENV, self.run_group.as_str()),
        ]
    }

    /// Export the identity process-wide.
    ///
    /// Must be called before the first component spawns and before the
    /// runtime goes multi-threaded with anything that reads the environment.
    pub fn export(&self) {
        for (key, value) in self.env_vars() {
            // SAFETY: called once during single-threaded driver startup,
            // before any component process is spawned.
            unsafe { std::env::set_var(key, value) };
        }
    }
}

impl From<&MainConfig> for TrackingContext {
    fn from(main: &MainConfig) -> Self {
        Self::new(&main.project_name, &main.experiment_name)
    }
}
