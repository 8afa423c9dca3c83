//! Core data models for repograde
//!
//! These models represent one analysis request end to end: the per-analyzer
//! results, the derived category scores, and the final report artifact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw, analyzer-specific metrics keyed by name.
///
/// A `BTreeMap` keeps serialization order deterministic so that two runs
/// against the same repository snapshot produce byte-identical reports.
pub type RawMetrics = BTreeMap<String, serde_json::Value>;

/// The fixed set of analyzer kinds the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    LintPython,
    LintJs,
    Complexity,
    Documentation,
    Dependency,
    Security,
}

impl AnalyzerKind {
    /// All kinds, in report order.
    pub const ALL: [AnalyzerKind; 6] = [
        AnalyzerKind::LintPython,
        AnalyzerKind::LintJs,
        AnalyzerKind::Complexity,
        AnalyzerKind::Documentation,
        AnalyzerKind::Dependency,
        AnalyzerKind::Security,
    ];

    /// Whether this kind contributes to the composite code-quality score.
    pub fn contributes_to_composite(&self) -> bool {
        matches!(
            self,
            AnalyzerKind::LintPython | AnalyzerKind::LintJs | AnalyzerKind::Complexity
        )
    }
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerKind::LintPython => write!(f, "lint-python"),
            AnalyzerKind::LintJs => write!(f, "lint-js"),
            AnalyzerKind::Complexity => write!(f, "complexity"),
            AnalyzerKind::Documentation => write!(f, "documentation"),
            AnalyzerKind::Dependency => write!(f, "dependency"),
            AnalyzerKind::Security => write!(f, "security"),
        }
    }
}

/// Outcome status of one analyzer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerStatus {
    /// The analyzer produced usable metrics and a normalized score.
    Ok,
    /// Nothing applicable to evaluate. Not an error, not a zero score.
    NoSignal,
    /// Tool missing, tool crashed, or output unparseable.
    Error,
    /// The underlying tool overran its budget and was killed.
    Timeout,
}

impl std::fmt::Display for AnalyzerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerStatus::Ok => write!(f, "ok"),
            AnalyzerStatus::NoSignal => write!(f, "no-signal"),
            AnalyzerStatus::Error => write!(f, "error"),
            AnalyzerStatus::Timeout => write!(f, "timeout"),
        }
    }
}

/// Result of one analyzer invocation.
///
/// Invariant: `score` is `Some` only when `status` is `Ok`, and is always
/// within `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub kind: AnalyzerKind,
    pub status: AnalyzerStatus,
    #[serde(default)]
    pub metrics: RawMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Diagnostic message. Present on error/timeout; also carries the
    /// reason a no-signal result was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

impl AnalyzerResult {
    pub fn ok(kind: AnalyzerKind, metrics: RawMetrics, score: f64, duration_ms: u64) -> Self {
        Self {
            kind,
            status: AnalyzerStatus::Ok,
            metrics,
            score: Some(score.clamp(0.0, 100.0)),
            message: None,
            duration_ms,
        }
    }

    pub fn no_signal(kind: AnalyzerKind, reason: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            status: AnalyzerStatus::NoSignal,
            metrics: RawMetrics::new(),
            score: None,
            message: Some(reason.into()),
            duration_ms,
        }
    }

    pub fn error(kind: AnalyzerKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            status: AnalyzerStatus::Error,
            metrics: RawMetrics::new(),
            score: None,
            message: Some(message.into()),
            duration_ms,
        }
    }

    pub fn timeout(kind: AnalyzerKind, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind,
            status: AnalyzerStatus::Timeout,
            metrics: RawMetrics::new(),
            score: None,
            message: Some(message.into()),
            duration_ms,
        }
    }

    /// True when the analyzer produced a usable normalized score.
    pub fn has_signal(&self) -> bool {
        self.status == AnalyzerStatus::Ok && self.score.is_some()
    }
}

/// Report categories derived from analyzer results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CodeQuality,
    Documentation,
    Security,
    Dependencies,
    Complexity,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::CodeQuality => write!(f, "code_quality"),
            Category::Documentation => write!(f, "documentation"),
            Category::Security => write!(f, "security"),
            Category::Dependencies => write!(f, "dependencies"),
            Category::Complexity => write!(f, "complexity"),
        }
    }
}

/// Normalized score for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    /// True when no contributing analyzer had signal and the score is the
    /// declared neutral default rather than a measurement.
    pub defaulted: bool,
}

/// Terminal report artifact for one analysis request.
///
/// Constructed once per request and immutable after aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Source locator as given by the caller.
    pub repository: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub results: Vec<AnalyzerResult>,
    pub categories: Vec<CategoryScore>,
    pub composite_score: f64,
    pub grade: String,
    /// Fatal conditions that stopped part of the pipeline.
    pub errors: Vec<String>,
    /// Non-fatal anomalies, e.g. cleanup failure.
    pub warnings: Vec<String>,
}

impl Report {
    /// Calculate letter grade from a 0-100 score.
    pub fn grade_from_score(score: f64) -> String {
        match score {
            s if s >= 90.0 => "A".to_string(),
            s if s >= 80.0 => "B".to_string(),
            s if s >= 70.0 => "C".to_string(),
            s if s >= 60.0 => "D".to_string(),
            _ => "F".to_string(),
        }
    }

    /// True when the request failed before any analyzer could run.
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Score for a category, if present.
    pub fn category_score(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Result for an analyzer kind, if present.
    pub fn analyzer_result(&self, kind: AnalyzerKind) -> Option<&AnalyzerResult> {
        self.results.iter().find(|r| r.kind == kind)
    }
}
