//! Pipeline configuration (set once at startup, never changes).
//!
//! A run is fully described by a YAML document with `main`, `etl` and
//! `modeling` sections, optionally patched by `key=value` overrides from the
//! command line before deserialization. The typed config is immutable for the
//! duration of the run.

mod overrides;

use crate::errors::{PipelineError, PipelineResult};
use crate::steps::active_steps;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub main: MainConfig,
    pub etl: EtlConfig,
    pub modeling: ModelingConfig,
}

/// Grouping identifiers, component resolution base and step selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    /// Tracking-service project all runs are registered under.
    pub project_name: String,
    /// Tracking-service run group (experiment) for this invocation.
    pub experiment_name: String,
    /// Base location (local path or remote reference) from which remote
    /// components are resolved as `{components_repository}/{component}`.
    pub components_repository: String,
    /// `"all"` or a comma-separated subset of known step names.
    pub steps: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Which raw data sample the download step fetches.
    pub sample: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelingConfig {
    /// Flat hyperparameter mapping, serialized verbatim to the JSON side-file
    /// the training component consumes. The driver never interprets it.
    pub random_forest: serde_json::Map<String, serde_json::Value>,
}

impl PipelineConfig {
    /// Load configuration from a YAML file, applying `key=value` overrides to
    /// the raw document before deserialization.
    ///
    /// # Errors
    ///
    /// `Config` for unreadable or malformed documents, unknown override keys,
    /// or missing required keys; `UnknownStep` if `main.steps` names a step
    /// outside the fixed list. All of these surface before anything runs.
    pub fn load(path: &Path, cli_overrides: &[String]) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut doc: serde_yaml::Value = serde_yaml::from_str(&raw).map_err(|e| {
            PipelineError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        for raw_override in cli_overrides {
            let (key, value) = overrides::parse(raw_override)?;
            overrides::apply(&mut doc, key, value)?;
        }

        let config: PipelineConfig = serde_yaml::from_value(doc)
            .map_err(|e| PipelineError::Config(format!("invalid configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the parts the driver depends on before dispatch.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.main.project_name.is_empty() {
            return Err(PipelineError::Config("main.project_name is empty".into()));
        }
        if self.main.experiment_name.is_empty() {
            return Err(PipelineError::Config("main.experiment_name is empty".into()));
        }
        if self.main.components_repository.is_empty() {
            return Err(PipelineError::Config(
                "main.components_repository is empty".into(),
            ));
        }

        // Malformed step lists are a startup error, not a dispatch-time one.
        active_steps(&self.main.steps)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
main:
  project_name: nyc_airbnb
  experiment_name: development
  components_repository: "https://github.com/pipelite-ml/components#components"
  steps: all
etl:
  sample: "sample1.csv"
modeling:
  random_forest:
    n_estimators: 100
    max_depth: 10
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_typed_config() {
        let file = write_config(SAMPLE);
        let config = PipelineConfig::load(file.path(), &[]).unwrap();
        assert_eq!(config.main.project_name, "nyc_airbnb");
        assert_eq!(config.etl.sample, "sample1.csv");
        assert_eq!(
            config.modeling.random_forest.get("n_estimators"),
            Some(&serde_json::json!(100))
        );
    }

    #[test]
    fn cli_overrides_patch_the_document() {
        let file = write_config(SAMPLE);
        let config = PipelineConfig::load(
            file.path(),
            &[
                "main.steps=download,basic_cleaning".to_string(),
                "modeling.random_forest.max_depth=25".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(config.main.steps, "download,basic_cleaning");
        assert_eq!(
            config.modeling.random_forest.get("max_depth"),
            Some(&serde_json::json!(25))
        );
    }

    #[test]
    fn unknown_override_key_is_rejected() {
        let file = write_config(SAMPLE);
        let err = PipelineConfig::load(file.path(), &["main.nope=1".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn bad_step_list_fails_at_load() {
        let file = write_config(SAMPLE);
        let err =
            PipelineConfig::load(file.path(), &["main.steps=deploy".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownStep(_)));
    }

    #[test]
    fn missing_section_is_a_config_error() {
        let file = write_config("main:\n  project_name: p\n");
        let err = PipelineConfig::load(file.path(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
