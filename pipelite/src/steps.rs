//! The fixed, ordered pipeline stage list and step-subset parsing.

use crate::errors::{PipelineError, PipelineResult};
use std::fmt;
use std::str::FromStr;

/// One named unit of pipeline work, implemented by an external component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Download,
    BasicCleaning,
    DataCheck,
    DataSplit,
    TrainRandomForest,
    TestRegressionModel,
}

/// Every known step, in dispatch order.
pub const ALL_STEPS: [Step; 6] = [
    Step::Download,
    Step::BasicCleaning,
    Step::DataCheck,
    Step::DataSplit,
    Step::TrainRandomForest,
    Step::TestRegressionModel,
];

/// Steps executed for `main.steps = "all"`.
///
/// `test_regression_model` is deliberately excluded so it cannot run by
/// mistake: a model export must be promoted to `prod` first, and the step has
/// to be requested by name.
pub const DEFAULT_STEPS: [Step; 5] = [
    Step::Download,
    Step::BasicCleaning,
    Step::DataCheck,
    Step::DataSplit,
    Step::TrainRandomForest,
];

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Download => "download",
            Step::BasicCleaning => "basic_cleaning",
            Step::DataCheck => "data_check",
            Step::DataSplit => "data_split",
            Step::TrainRandomForest => "train_random_forest",
            Step::TestRegressionModel => "test_regression_model",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STEPS
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownStep(s.to_string()))
    }
}

/// Resolve `main.steps` into the active step list.
///
/// `"all"` selects [`DEFAULT_STEPS`]. Otherwise the value is a comma-separated
/// subset of known step names; the result is the ordered intersection of the
/// fixed step list with the named set, so dispatch order never depends on the
/// order the operator wrote the names in.
///
/// # Errors
///
/// `UnknownStep` for any name not in the fixed list, `Config` for an empty
/// list entry. Both surface at startup, before anything runs.
pub fn active_steps(spec: &str) -> PipelineResult<Vec<Step>> {
    if spec == "all" {
        return Ok(DEFAULT_STEPS.to_vec());
    }

    let mut requested = Vec::new();
    for name in spec.split(',') {
        let name = name.trim();
        if name.is_empty() {
            return Err(PipelineError::Config(format!(
                "empty step name in steps list '{}'",
                spec
            )));
        }
        requested.push(Step::from_str(name)?);
    }

    Ok(ALL_STEPS
        .into_iter()
        .filter(|step| requested.contains(step))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_excludes_regression_test() {
        let steps = active_steps("all").unwrap();
        assert_eq!(steps, DEFAULT_STEPS.to_vec());
        assert!(!steps.contains(&Step::TestRegressionModel));
    }

    #[test]
    fn subset_keeps_fixed_order() {
        // Operator order is irrelevant; dispatch order is fixed.
        let steps = active_steps("data_check,download").unwrap();
        assert_eq!(steps, vec![Step::Download, Step::DataCheck]);
    }

    #[test]
    fn regression_test_runs_only_when_named() {
        let steps = active_steps("test_regression_model").unwrap();
        assert_eq!(steps, vec![Step::TestRegressionModel]);
    }

    #[test]
    fn names_are_trimmed() {
        let steps = active_steps(" download , basic_cleaning ").unwrap();
        assert_eq!(steps, vec![Step::Download, Step::BasicCleaning]);
    }

    #[test]
    fn unknown_step_is_rejected() {
        let err = active_steps("download,deploy").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownStep(name) if name == "deploy"));
    }

    #[test]
    fn empty_entry_is_rejected() {
        assert!(matches!(
            active_steps("download,,data_check").unwrap_err(),
            PipelineError::Config(_)
        ));
    }

    #[test]
    fn duplicates_collapse() {
        let steps = active_steps("download,download").unwrap();
        assert_eq!(steps, vec![Step::Download]);
    }
}
