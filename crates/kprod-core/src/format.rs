//! JSON pretty-printing for the message value field.

use serde_json::Value;

use crate::error::FormatError;

/// Result of formatting a message value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// Value was empty. Nothing was changed.
    Empty,
    /// Canonical 2-space indented rendering.
    Pretty(String),
}

/// Re-serialize `source` as indented JSON.
///
/// Object keys come out sorted, so formatting is idempotent: formatting the
/// output again yields the same text.
pub fn pretty_json(source: &str) -> Result<Formatted, FormatError> {
    if source.is_empty() {
        return Ok(Formatted::Empty);
    }

    let value: Value =
        serde_json::from_str(source).map_err(|e| FormatError { reason: e.to_string() })?;

    serde_json::to_string_pretty(&value)
        .map(Formatted::Pretty)
        .map_err(|e| FormatError { reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_nothing_to_format() {
        assert_eq!(pretty_json(""), Ok(Formatted::Empty));
    }

    #[test]
    fn object_is_indented() {
        assert_eq!(pretty_json(r#"{"a":1}"#), Ok(Formatted::Pretty("{\n  \"a\": 1\n}".into())));
    }

    #[test]
    fn formatting_is_idempotent() {
        let Ok(Formatted::Pretty(once)) = pretty_json(r#"{"b":[1,2],"a":{"c":null}}"#) else {
            panic!("valid JSON should format");
        };
        assert_eq!(pretty_json(&once), Ok(Formatted::Pretty(once.clone())));
    }

    #[test]
    fn formatted_output_reparses_to_same_value() {
        let source = r#"{"name":"kafka","tags":["a","b"],"n":1.5}"#;
        let Ok(Formatted::Pretty(pretty)) = pretty_json(source) else {
            panic!("valid JSON should format");
        };

        let before: Value = serde_json::from_str(source).unwrap();
        let after: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn invalid_json_reports_position() {
        let err = pretty_json("{\"a\":").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON:"), "{err}");
        assert!(err.reason.contains("line 1"), "{err}");
    }
}
