//! Cyclomatic complexity adapter (radon cc)

use crate::analyzers::tool::run_tool;
use crate::analyzers::{has_file_with_extension, Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use std::time::Duration;

/// Functions above this cyclomatic complexity count as complex.
const COMPLEX_THRESHOLD: u64 = 10;

pub struct CyclomaticComplexity;

/// Per-function roll-up of radon's JSON output.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ComplexitySummary {
    pub functions: u64,
    pub total_complexity: u64,
    pub complex_functions: u64,
}

impl ComplexitySummary {
    pub fn average(&self) -> f64 {
        if self.functions == 0 {
            0.0
        } else {
            self.total_complexity as f64 / self.functions as f64
        }
    }
}

/// Radon emits `{ "file.py": [ { "complexity": N, ... }, ... ], ... }`.
pub(crate) fn summarize(json: &serde_json::Value) -> ComplexitySummary {
    let mut summary = ComplexitySummary::default();
    let Some(files) = json.as_object() else {
        return summary;
    };
    for entries in files.values() {
        let Some(entries) = entries.as_array() else {
            // Radon reports per-file errors as objects; skip them.
            continue;
        };
        for entry in entries {
            let complexity = entry.get("complexity").and_then(|c| c.as_u64()).unwrap_or(1);
            summary.functions += 1;
            summary.total_complexity += complexity;
            if complexity > COMPLEX_THRESHOLD {
                summary.complex_functions += 1;
            }
        }
    }
    summary
}

impl Analyzer for CyclomaticComplexity {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Complexity
    }

    fn applicable(&self, workspace: &Workspace) -> bool {
        has_file_with_extension(workspace.path(), &["py"])
    }

    fn budget_secs(&self) -> u64 {
        60
    }

    fn collect(&self, workspace: &Workspace, budget: Duration) -> Signal {
        let cmd = vec![
            "radon".to_string(),
            "cc".to_string(),
            "--json".to_string(),
            ".".to_string(),
        ];
        let out = run_tool(&cmd, "radon", budget, Some(workspace.path()));

        if out.timed_out {
            return Signal::TimedOut(out.error.unwrap_or_else(|| "radon timed out".into()));
        }
        if let Some(err) = out.error {
            return Signal::Fail(err);
        }
        if !out.success() {
            return Signal::Fail(format!(
                "radon exited with {:?}: {}",
                out.exit_code,
                out.stderr.lines().next().unwrap_or("").trim()
            ));
        }

        let Some(json) = out.json() else {
            return Signal::Fail("radon output was not parseable JSON".into());
        };

        let summary = summarize(&json);
        if summary.functions == 0 {
            return Signal::Skip("no functions to measure".into());
        }

        let mut metrics = RawMetrics::new();
        metrics.insert("functions".into(), summary.functions.into());
        metrics.insert(
            "average_complexity".into(),
            // Two decimals keeps the report stable across float formatting.
            ((summary.average() * 100.0).round() / 100.0).into(),
        );
        metrics.insert("complex_functions".into(), summary.complex_functions.into());
        Signal::Metrics(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_counts_functions() {
        let data = json!({
            "a.py": [{"complexity": 3}, {"complexity": 12}],
            "b.py": [{"complexity": 5}],
        });
        let summary = summarize(&data);
        assert_eq!(summary.functions, 3);
        assert_eq!(summary.total_complexity, 20);
        assert_eq!(summary.complex_functions, 1);
        assert!((summary.average() - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_skips_error_entries() {
        let data = json!({
            "bad.py": {"error": "could not parse"},
            "ok.py": [{"complexity": 2}],
        });
        let summary = summarize(&data);
        assert_eq!(summary.functions, 1);
    }

    #[test]
    fn test_empty_summary_average_is_zero() {
        let summary = summarize(&json!({}));
        assert_eq!(summary.functions, 0);
        assert_eq!(summary.average(), 0.0);
    }
}
