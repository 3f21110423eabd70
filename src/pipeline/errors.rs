//! Structured spec diagnostics.

use std::fmt;

use serde::Serialize;

use super::error_code::ErrorCode;

/// One problem found in an [`AnalysisSpec`](super::spec::AnalysisSpec).
///
/// `path` is a JSON pointer into the spec document (`""` for the root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecError {
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "[{}] {}: {}", self.code, path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_path_and_hint() {
        let err = SpecError::new(ErrorCode::OutOfRange, "/views/kwic/window", "window is 0")
            .with_hint("use 1..=15");
        assert_eq!(
            err.to_string(),
            "[out_of_range] /views/kwic/window: window is 0 (hint: use 1..=15)"
        );
    }

    #[test]
    fn test_root_path_and_missing_hint() {
        let err = SpecError::new(ErrorCode::UnknownField, "", "bad");
        assert_eq!(err.to_string(), "[unknown_field] /: bad");
        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("hint").is_none());
    }
}
