//! Dotted-path `key=value` overrides for the raw configuration document.

use crate::errors::{PipelineError, PipelineResult};
use serde_yaml::Value;

/// Split a raw `key=value` argument and parse the value as a YAML scalar.
///
/// Values that are not valid YAML on their own (rare) fall back to plain
/// strings, so `main.steps=download,basic_cleaning` stays a single string.
pub(crate) fn parse(raw: &str) -> PipelineResult<(&str, Value)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        PipelineError::Config(format!("override '{}' is not of the form key=value", raw))
    })?;

    if key.is_empty() {
        return Err(PipelineError::Config(format!(
            "override '{}' has an empty key",
            raw
        )));
    }

    let parsed = serde_yaml::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key, parsed))
}

/// Apply one override to the document, walking mapping keys along the dotted
/// path. Only existing keys may be overridden; there is no syntax for adding
/// new configuration keys from the command line.
pub(crate) fn apply(doc: &mut Value, path: &str, new_value: Value) -> PipelineResult<()> {
    let mut segments = path.split('.').peekable();
    let mut current = doc;

    while let Some(segment) = segments.next() {
        let mapping = current.as_mapping_mut().ok_or_else(|| {
            PipelineError::Config(format!(
                "cannot override '{}': '{}' is not a section",
                path, segment
            ))
        })?;

        let key = Value::String(segment.to_string());
        let entry = mapping.get_mut(&key).ok_or_else(|| {
            PipelineError::Config(format!(
                "cannot override '{}': no such configuration key '{}'",
                path, segment
            ))
        })?;

        if segments.peek().is_none() {
            *entry = new_value;
            return Ok(());
        }
        current = entry;
    }

    Err(PipelineError::Config(format!(
        "cannot override empty key path '{}'",
        path
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        serde_yaml::from_str(
            r#"
main:
  steps: all
modeling:
  random_forest:
    max_depth: 10
"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_scalar_types() {
        let (_, v) = parse("modeling.random_forest.max_depth=25").unwrap();
        assert_eq!(v, Value::Number(25.into()));

        let (_, v) = parse("main.steps=download,data_check").unwrap();
        assert_eq!(v, Value::String("download,data_check".into()));
    }

    #[test]
    fn rejects_malformed_overrides() {
        assert!(parse("main.steps").is_err());
        assert!(parse("=value").is_err());
    }

    #[test]
    fn applies_nested_override() {
        let mut doc = doc();
        apply(&mut doc, "modeling.random_forest.max_depth", 25.into()).unwrap();
        assert_eq!(
            doc["modeling"]["random_forest"]["max_depth"],
            Value::Number(25.into())
        );
    }

    #[test]
    fn rejects_unknown_path() {
        let mut doc = doc();
        let err = apply(&mut doc, "main.missing", 1.into()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_path_through_scalar() {
        let mut doc = doc();
        let err = apply(&mut doc, "main.steps.nested", 1.into()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
