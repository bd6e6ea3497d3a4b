//! pipelite: a driver that sequences ML pipeline stages.
//!
//! The driver reads a hierarchical configuration, resolves the active subset
//! of a fixed ordered stage list, and invokes one external MLflow component
//! per stage, strictly in order, inside a scoped temporary run directory.
//! Artifacts flow between stages by name (`name:tag`) through the W&B
//! tracking service; the driver itself owns no durable state and contains no
//! model code.

pub mod config;
pub mod driver;
pub mod errors;
pub mod launcher;
pub mod pipeline;
pub mod rundir;
pub mod steps;
pub mod tracking;

pub use config::PipelineConfig;
pub use driver::PipelineDriver;
pub use errors::{PipelineError, PipelineResult};
pub use launcher::{ComponentLauncher, ComponentSpec, EnvManager, MlflowLauncher};
pub use rundir::RunDir;
pub use steps::{ALL_STEPS, DEFAULT_STEPS, Step, active_steps};
pub use tracking::TrackingContext;
