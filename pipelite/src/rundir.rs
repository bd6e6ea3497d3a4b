//! Scoped temporary run directory.

use crate::errors::{PipelineError, PipelineResult};
use std::path::Path;
use tempfile::TempDir;

/// Process-scoped temporary directory for ephemeral run files.
///
/// Created before any stage executes and removed when dropped, whether the
/// run succeeded or failed. Components run with this as their working
/// directory; the hyperparameter side-file lives here and nowhere else.
pub struct RunDir {
    dir: TempDir,
}

impl RunDir {
    pub fn create() -> PipelineResult<Self> {
        let dir = TempDir::with_prefix("pipelite-").map_err(|e| {
            PipelineError::Storage(format!("failed to create run directory: {}", e))
        })?;

        tracing::debug!(path = %dir.path().display(), "created run directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
