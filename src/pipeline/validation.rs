//! Validation engine for analysis specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`AnalysisSpec`](super::spec::AnalysisSpec) and collects every diagnostic
//! into a [`ValidationReport`]. It never stops at the first error, so users
//! see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_textmining::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::SpecError;
use super::spec::*;
use crate::types::SELECTABLE_POS;

/// Largest node threshold offered by interactive front ends.
pub const NODE_MIN_FREQ_RECOMMENDED_MAX: usize = 20;
/// Largest edge threshold offered by interactive front ends.
pub const EDGE_MIN_FREQ_RECOMMENDED_MAX: usize = 10;
/// Largest KWIC window offered by interactive front ends.
pub const KWIC_WINDOW_RECOMMENDED_MAX: usize = 15;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding: a [`SpecError`] with a severity.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: SpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: SpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: SpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &SpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &SpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Total number of diagnostics (errors + warnings).
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`AnalysisSpec`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so a long-lived engine can
/// be shared across threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"thresholds"`).
    fn name(&self) -> &str;

    /// Inspect `spec` and return any findings.
    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against an [`AnalysisSpec`] and
/// collects all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(DictionaryRule));
        engine.add_rule(Box::new(ThresholdsRule));
        engine.add_rule(Box::new(KwicWindowRule));
        engine.add_rule(Box::new(TargetPosRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &AnalysisSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Spec version ────────────────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\" to {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Tokenizer dictionary must be configured ─────────────────────────────

struct DictionaryRule;

impl ValidationRule for DictionaryRule {
    fn name(&self) -> &str {
        "dictionary"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let configured = spec
            .tokenizer
            .dictionary
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if configured {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::MissingSetting,
                "/tokenizer/dictionary",
                "no tokenizer dictionary is configured",
            )
            .with_hint("Point \"dictionary\" at a vibrato system dictionary (e.g. ipadic system.dic.zst)"),
        )]
    }
}

// ─── 3. Frequency thresholds and word limits ────────────────────────────────

struct ThresholdsRule;

impl ThresholdsRule {
    fn check(path: &str, value: usize, recommended_max: Option<usize>) -> Option<ValidationDiagnostic> {
        if value == 0 {
            return Some(ValidationDiagnostic::error(
                SpecError::new(ErrorCode::OutOfRange, path, "must be at least 1")
                    .with_hint("Use 1 to keep everything"),
            ));
        }
        match recommended_max {
            Some(max) if value > max => Some(ValidationDiagnostic::warning(
                SpecError::new(
                    ErrorCode::OutOfRange,
                    path,
                    format!("{value} is above the usual maximum of {max}"),
                )
                .with_hint("High thresholds usually leave the network empty"),
            )),
            _ => None,
        }
    }
}

impl ValidationRule for ThresholdsRule {
    fn name(&self) -> &str {
        "thresholds"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let network = &spec.views.network;
        [
            Self::check(
                "/views/network/node_min_freq",
                network.node_min_freq,
                Some(NODE_MIN_FREQ_RECOMMENDED_MAX),
            ),
            Self::check(
                "/views/network/edge_min_freq",
                network.edge_min_freq,
                Some(EDGE_MIN_FREQ_RECOMMENDED_MAX),
            ),
            Self::check("/views/word_cloud/max_words", spec.views.word_cloud.max_words, None),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ─── 4. KWIC window ─────────────────────────────────────────────────────────

struct KwicWindowRule;

impl ValidationRule for KwicWindowRule {
    fn name(&self) -> &str {
        "kwic_window"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let window = spec.views.kwic.window;
        let message = if window == 0 {
            "window is 0; hits will have no context".to_string()
        } else if window > KWIC_WINDOW_RECOMMENDED_MAX {
            format!("window {window} is above the usual maximum of {KWIC_WINDOW_RECOMMENDED_MAX}")
        } else {
            return vec![];
        };
        vec![ValidationDiagnostic::warning(
            SpecError::new(ErrorCode::OutOfRange, "/views/kwic/window", message)
                .with_hint(format!("Use a window between 1 and {KWIC_WINDOW_RECOMMENDED_MAX}")),
        )]
    }
}

// ─── 5. Target POS lists ────────────────────────────────────────────────────

struct TargetPosRule;

impl TargetPosRule {
    fn check(view: &str, tags: &[String]) -> Vec<ValidationDiagnostic> {
        let path = format!("/views/{view}/target_pos");
        if tags.is_empty() {
            return vec![ValidationDiagnostic::warning(
                SpecError::new(ErrorCode::InvalidPos, path, "no target POS selected; the view will be empty")
                    .with_hint(format!("Select from: {}", SELECTABLE_POS.join(", "))),
            )];
        }
        tags.iter()
            .enumerate()
            .filter(|(_, tag)| !SELECTABLE_POS.contains(&tag.as_str()))
            .map(|(i, tag)| {
                ValidationDiagnostic::warning(
                    SpecError::new(
                        ErrorCode::InvalidPos,
                        format!("{path}/{i}"),
                        format!("\"{tag}\" is not a selectable POS"),
                    )
                    .with_hint(format!("Select from: {}", SELECTABLE_POS.join(", "))),
                )
            })
            .collect()
    }
}

impl ValidationRule for TargetPosRule {
    fn name(&self) -> &str {
        "target_pos"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let views = &spec.views;
        let mut out = Self::check("report", &views.report.target_pos);
        out.extend(Self::check("word_cloud", &views.word_cloud.target_pos));
        out.extend(Self::check("network", &views.network.target_pos));
        out
    }
}

// ─── 6. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`
    /// from the extra fields captured by `#[serde(flatten)]`.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    SpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &AnalysisSpec) -> Vec<ValidationDiagnostic> {
        let sections: [(&str, &HashMap<String, serde_json::Value>); 9] = [
            ("", &spec.unknown_fields),
            ("/tokenizer", &spec.tokenizer.unknown_fields),
            ("/stop_words", &spec.stop_words.unknown_fields),
            ("/views", &spec.views.unknown_fields),
            ("/views/report", &spec.views.report.unknown_fields),
            ("/views/word_cloud", &spec.views.word_cloud.unknown_fields),
            ("/views/network", &spec.views.network.unknown_fields),
            ("/views/kwic", &spec.views.kwic.unknown_fields),
            ("/runtime", &spec.runtime.unknown_fields),
        ];
        sections
            .into_iter()
            .flat_map(|(path, unknowns)| Self::check_unknowns(path, unknowns, spec.strict))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
