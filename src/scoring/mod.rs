//! Score normalization policies
//!
//! One pure, total function per analyzer kind mapping raw metrics onto
//! `[0, 100]`. Every policy is monotonic (fewer or less severe findings
//! never lowers the score) and saturating: penalties are capped and the
//! result is clamped, so no metric combination can produce a negative or
//! unbounded score.

pub mod aggregate;

use crate::models::{AnalyzerKind, RawMetrics};

fn get_u64(metrics: &RawMetrics, key: &str) -> u64 {
    metrics.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
}

fn get_f64(metrics: &RawMetrics, key: &str) -> f64 {
    metrics.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn get_bool(metrics: &RawMetrics, key: &str) -> bool {
    metrics.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Normalize raw metrics for `kind` onto `[0, 100]`.
pub fn normalize(kind: AnalyzerKind, metrics: &RawMetrics) -> f64 {
    let score = match kind {
        AnalyzerKind::LintPython => lint_python(metrics),
        AnalyzerKind::LintJs => lint_js(metrics),
        AnalyzerKind::Complexity => complexity(metrics),
        AnalyzerKind::Documentation => documentation(metrics),
        AnalyzerKind::Dependency => dependency(metrics),
        AnalyzerKind::Security => security(metrics),
    };
    score.clamp(0.0, 100.0)
}

/// Clean run scores 90; otherwise `80 - min(50, 2*issues + 5*critical)`.
fn lint_python(metrics: &RawMetrics) -> f64 {
    if get_bool(metrics, "clean") {
        return 90.0;
    }
    let issues = get_u64(metrics, "issues");
    let critical = get_u64(metrics, "critical_issues");
    let penalty = (issues.saturating_mul(2) + critical.saturating_mul(5)).min(50);
    80.0 - penalty as f64
}

/// No declared config scores a partial 40; otherwise
/// `80 - min(60, issues + 3*critical)`.
fn lint_js(metrics: &RawMetrics) -> f64 {
    if !get_bool(metrics, "has_config") {
        return 40.0;
    }
    let issues = get_u64(metrics, "issues");
    let critical = get_u64(metrics, "critical_issues");
    let penalty = (issues + critical.saturating_mul(3)).min(60);
    80.0 - penalty as f64
}

/// Banded on average cyclomatic complexity.
fn complexity(metrics: &RawMetrics) -> f64 {
    let average = get_f64(metrics, "average_complexity");
    match average {
        a if a <= 5.0 => 90.0,
        a if a <= 10.0 => 70.0,
        a if a <= 20.0 => 40.0,
        _ => 20.0,
    }
}

/// Readability band from average sentence length: shorter sentences read
/// better. Non-linear banding rather than a continuous formula so one
/// pathological document cannot drag the score out of range.
fn readability_band(avg_sentence_length: f64) -> f64 {
    match avg_sentence_length {
        a if a <= 15.0 => 90.0,
        a if a <= 25.0 => 70.0,
        a if a <= 40.0 => 50.0,
        _ => 30.0,
    }
}

/// Base 40 for having a README, per-section bonuses, code-example bonus,
/// readability bonus `(band - 50) / 2`. No README scores the declared
/// minimum of 0.
fn documentation(metrics: &RawMetrics) -> f64 {
    if !get_bool(metrics, "has_readme") {
        return 0.0;
    }
    let mut score = 40.0;
    if get_bool(metrics, "has_installation") {
        score += 15.0;
    }
    if get_bool(metrics, "has_usage") {
        score += 10.0;
    }
    if get_bool(metrics, "has_contributing") {
        score += 10.0;
    }
    if get_u64(metrics, "code_examples") > 0 {
        score += 15.0;
    }
    if get_bool(metrics, "has_license") {
        score += 10.0;
    }
    score += (readability_band(get_f64(metrics, "avg_sentence_length")) - 50.0) / 2.0;
    score
}

/// 15 points per manifest, 20 for any lockfile, 10 for security-scanning
/// config. A bare repository scores 0.
fn dependency(metrics: &RawMetrics) -> f64 {
    let mut score = 15.0 * get_u64(metrics, "manifest_count") as f64;
    if get_bool(metrics, "has_lockfiles") {
        score += 20.0;
    }
    if get_bool(metrics, "has_security_config") {
        score += 10.0;
    }
    score
}

/// Declared minimum baseline of 30 when no posture markers exist; an empty
/// repository is not scored as actively insecure.
const SECURITY_BASELINE: f64 = 30.0;

fn security(metrics: &RawMetrics) -> f64 {
    let mut score = 0.0;
    if get_bool(metrics, "has_security_md") {
        score += 20.0;
    }
    if get_bool(metrics, "has_github_security_policy") {
        score += 20.0;
    }
    if get_bool(metrics, "has_dependabot") {
        score += 15.0;
    }
    if get_bool(metrics, "has_code_scanning") {
        score += 15.0;
    }
    if score == 0.0 {
        SECURITY_BASELINE
    } else {
        score
    }
}
