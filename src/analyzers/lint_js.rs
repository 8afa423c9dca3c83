//! JavaScript/TypeScript lint adapter (eslint via npx)
//!
//! Without an eslint configuration the adapter reports a partial signal
//! (the repo has JS/TS but no declared lint policy) instead of running the
//! tool against defaults it never chose.

use crate::analyzers::tool::run_tool;
use crate::analyzers::{has_file_with_extension, Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use std::path::Path;
use std::time::Duration;

const SOURCE_EXTENSIONS: [&str; 4] = ["js", "ts", "jsx", "tsx"];

const CONFIG_FILES: [&str; 7] = [
    ".eslintrc.json",
    ".eslintrc.js",
    ".eslintrc.yml",
    ".eslintrc.yaml",
    "eslint.config.js",
    "eslint.config.mjs",
    "package.json",
];

/// Rule ids weighted as critical.
const CRITICAL_RULES: [&str; 3] = ["no-unused-vars", "no-unreachable", "error"];

pub struct LintJs;

fn has_eslint_config(root: &Path) -> bool {
    CONFIG_FILES.iter().any(|f| root.join(f).is_file())
}

/// Count total and critical messages in eslint's JSON output.
pub(crate) fn parse_messages(files: &[serde_json::Value]) -> (u64, u64) {
    let mut issues = 0;
    let mut critical = 0;
    for file in files {
        let Some(messages) = file.get("messages").and_then(|m| m.as_array()) else {
            continue;
        };
        for message in messages {
            issues += 1;
            let rule = message
                .get("ruleId")
                .and_then(|r| r.as_str())
                .unwrap_or("")
                .to_lowercase();
            if CRITICAL_RULES.iter().any(|c| rule.contains(c)) {
                critical += 1;
            }
        }
    }
    (issues, critical)
}

impl Analyzer for LintJs {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::LintJs
    }

    fn applicable(&self, workspace: &Workspace) -> bool {
        has_file_with_extension(workspace.path(), &SOURCE_EXTENSIONS)
    }

    fn collect(&self, workspace: &Workspace, budget: Duration) -> Signal {
        let mut metrics = RawMetrics::new();

        if !has_eslint_config(workspace.path()) {
            metrics.insert("has_config".into(), false.into());
            return Signal::Metrics(metrics);
        }

        let cmd = vec![
            "npx".to_string(),
            "--yes".to_string(),
            "eslint".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "--no-error-on-unmatched-pattern".to_string(),
            ".".to_string(),
        ];
        let out = run_tool(&cmd, "eslint", budget, Some(workspace.path()));

        if out.timed_out {
            return Signal::TimedOut(out.error.unwrap_or_else(|| "eslint timed out".into()));
        }
        if let Some(err) = out.error {
            return Signal::Fail(err);
        }
        // 0 = no issues, 1 = issues found; anything else is an execution failure.
        if !matches!(out.exit_code, Some(0) | Some(1)) {
            return Signal::Fail(format!(
                "eslint exited with {:?}: {}",
                out.exit_code,
                out.stderr.lines().next().unwrap_or("").trim()
            ));
        }

        let Some(files) = out.json().and_then(|v| v.as_array().cloned()) else {
            return Signal::Fail("eslint output was not parseable JSON".into());
        };

        let (issues, critical) = parse_messages(&files);
        metrics.insert("has_config".into(), true.into());
        metrics.insert("issues".into(), issues.into());
        metrics.insert("critical_issues".into(), critical.into());
        Signal::Metrics(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_counts_and_critical_rules() {
        let files = vec![
            json!({"filePath": "a.js", "messages": [
                {"ruleId": "no-unused-vars", "severity": 2},
                {"ruleId": "semi", "severity": 1},
            ]}),
            json!({"filePath": "b.ts", "messages": [
                {"ruleId": "no-unreachable", "severity": 2},
            ]}),
            json!({"filePath": "c.ts", "messages": []}),
        ];
        let (issues, critical) = parse_messages(&files);
        assert_eq!(issues, 3);
        assert_eq!(critical, 2);
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let files = vec![json!({"filePath": "a.js"}), json!({"messages": [{}]})];
        let (issues, critical) = parse_messages(&files);
        assert_eq!(issues, 1);
        assert_eq!(critical, 0);
    }

    #[test]
    fn test_config_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_eslint_config(dir.path()));
        std::fs::write(dir.path().join(".eslintrc.json"), "{}").unwrap();
        assert!(has_eslint_config(dir.path()));
    }
}
