//! Error types shared across the driver.

use thiserror::Error;

/// Errors surfaced by the pipeline driver.
///
/// Configuration problems (`Config`, `UnknownStep`) are detected at startup,
/// before any component is launched. `Launch` and `Component` carry failures
/// from external component invocations unmodified; the component's own output
/// is the diagnostic and the driver only records which step failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown pipeline step '{0}'")]
    UnknownStep(String),

    /// The component process could not be started at all.
    #[error("failed to launch component for step '{step}': {reason}")]
    Launch { step: String, reason: String },

    /// The component process ran and exited unsuccessfully.
    #[error("component for step '{step}' failed (exit code {code:?})")]
    Component { step: String, code: Option<i32> },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
