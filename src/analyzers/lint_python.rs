//! Python lint adapter (flake8)
//!
//! Counts style findings and weights a fixed subset of codes as critical:
//! `E9xx` (syntax/indentation failures), all `F` codes (pyflakes), and the
//! expected-indent codes `E112`/`E113`.

use crate::analyzers::tool::run_tool;
use crate::analyzers::{has_file_with_extension, Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

pub struct LintPython;

/// `path:row:col: CODE message`
fn finding_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^.+?:\d+:\d+:\s+([A-Z]\d+)").expect("valid regex"))
}

fn is_critical(code: &str) -> bool {
    code.starts_with("E9") || code.starts_with('F') || code == "E112" || code == "E113"
}

/// Count total and critical findings in flake8 output.
pub(crate) fn parse_findings(output: &str) -> (u64, u64) {
    let mut issues = 0;
    let mut critical = 0;
    for caps in finding_re().captures_iter(output) {
        issues += 1;
        if is_critical(&caps[1]) {
            critical += 1;
        }
    }
    (issues, critical)
}

impl Analyzer for LintPython {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::LintPython
    }

    fn applicable(&self, workspace: &Workspace) -> bool {
        has_file_with_extension(workspace.path(), &["py"])
    }

    fn collect(&self, workspace: &Workspace, budget: Duration) -> Signal {
        let cmd = vec![
            "flake8".to_string(),
            "--statistics".to_string(),
            "--count".to_string(),
            ".".to_string(),
        ];
        let out = run_tool(&cmd, "flake8", budget, Some(workspace.path()));

        if out.timed_out {
            return Signal::TimedOut(out.error.unwrap_or_else(|| "flake8 timed out".into()));
        }
        if let Some(err) = out.error {
            return Signal::Fail(err);
        }

        let mut metrics = RawMetrics::new();
        if out.success() {
            metrics.insert("clean".into(), true.into());
            metrics.insert("issues".into(), 0u64.into());
            metrics.insert("critical_issues".into(), 0u64.into());
            return Signal::Metrics(metrics);
        }

        // Non-zero exit with findings on stdout; anything else is a crash.
        let (issues, critical) = parse_findings(&out.stdout);
        if issues == 0 {
            return Signal::Fail(format!(
                "flake8 exited with {:?} and no findings: {}",
                out.exit_code,
                out.stderr.lines().next().unwrap_or("").trim()
            ));
        }
        metrics.insert("clean".into(), false.into());
        metrics.insert("issues".into(), issues.into());
        metrics.insert("critical_issues".into(), critical.into());
        Signal::Metrics(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
app/main.py:3:1: E302 expected 2 blank lines, got 1
app/main.py:7:5: F401 'os' imported but unused
app/main.py:9:1: E999 SyntaxError: invalid syntax
lib/util.py:2:11: E112 expected an indented block
1     E302 expected 2 blank lines, got 1
4";

    #[test]
    fn test_parse_counts_issues_and_criticals() {
        let (issues, critical) = parse_findings(SAMPLE);
        // Statistics trailer lines do not match the location pattern.
        assert_eq!(issues, 4);
        // F401, E999, E112
        assert_eq!(critical, 3);
    }

    #[test]
    fn test_parse_empty_output() {
        assert_eq!(parse_findings(""), (0, 0));
    }

    #[test]
    fn test_critical_codes() {
        assert!(is_critical("E999"));
        assert!(is_critical("F821"));
        assert!(is_critical("E112"));
        assert!(!is_critical("E302"));
        assert!(!is_critical("W605"));
    }
}
