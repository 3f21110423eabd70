//! Stable, machine-readable codes for analysis spec diagnostics.

use std::fmt;

use serde::Serialize;

/// Category of a spec diagnostic. Serialized in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The `v` field names a version this crate does not understand.
    UnsupportedVersion,
    /// A required setting is absent (e.g. the tokenizer dictionary).
    MissingSetting,
    /// A numeric setting is outside its valid or recommended range.
    OutOfRange,
    /// A POS tag list is empty or names an unselectable tag.
    InvalidPos,
    /// A field is not part of the schema.
    UnknownField,
    /// Catch-all for custom rules.
    ValidationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::MissingSetting => "missing_setting",
            Self::OutOfRange => "out_of_range",
            Self::InvalidPos => "invalid_pos",
            Self::UnknownField => "unknown_field",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
