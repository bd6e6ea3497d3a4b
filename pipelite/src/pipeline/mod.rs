//! Table-driven pipeline execution framework.
//!
//! The driver expresses a run as an ordered table of tasks and hands it to a
//! generic executor:
//!
//! ```text
//! Pipeline → Tasks
//!
//! - Pipeline: ordered list of tasks, executed strictly one after another
//! - Task: atomic unit of work (here: one external component invocation)
//! ```
//!
//! Execution is strictly sequential: a task must finish before the next one
//! starts, and the first failure aborts the remaining tasks.

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod task;

pub use metrics::{PipelineMetrics, TaskMetrics};
pub use pipeline::{ExecutionPlan, Pipeline, PipelineBuilder, PipelineExecutor};
pub use task::{BoxedTask, PipelineTask};
