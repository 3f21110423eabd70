//! Error types
//!
//! Only genuinely fallible operations return [`MiningError`]: loading the
//! dictionary, parsing configuration, and rejecting invalid analysis specs.
//! Empty or insufficient input is not an error; see [`crate::types::Outcome`].

use std::path::PathBuf;

use crate::pipeline::validation::ValidationReport;

/// Result type with [`MiningError`] as the default error.
pub type Result<T, E = MiningError> = std::result::Result<T, E>;

/// Errors raised by the text-mining crate.
#[derive(Debug, thiserror::Error)]
pub enum MiningError {
    /// The dictionary file could not be opened or read.
    #[error("failed to read dictionary '{path}': {source}")]
    DictionaryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary was read but vibrato rejected it.
    #[error("failed to load dictionary '{path}': {source}")]
    DictionaryFormat {
        path: PathBuf,
        #[source]
        source: vibrato::errors::VibratoError,
    },

    /// No dictionary path was configured.
    #[error("no tokenizer dictionary is configured")]
    MissingDictionary,

    /// An analysis spec could not be parsed.
    #[error(transparent)]
    Config(#[from] serde_json::Error),

    /// An analysis spec was parsed but failed validation.
    #[error("invalid analysis spec: {}", summarize(.0))]
    InvalidSpec(ValidationReport),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn summarize(report: &ValidationReport) -> String {
    report
        .errors()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
