//! Security-posture adapter
//!
//! Checks for a published security policy and scans workflow files for
//! dependency-update and code-scanning keywords. Purely declarative: this
//! measures posture signals, it does not scan code for vulnerabilities.

use crate::analyzers::{Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use std::path::Path;
use std::time::Duration;

pub struct SecurityPosture;

fn workflow_texts(root: &Path) -> Vec<String> {
    let dir = root.join(".github").join("workflows");
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut texts = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
            .unwrap_or(false);
        if is_yaml {
            if let Ok(content) = std::fs::read_to_string(&path) {
                texts.push(content.to_lowercase());
            }
        }
    }
    texts
}

pub(crate) fn inspect(root: &Path) -> RawMetrics {
    let workflows = workflow_texts(root);
    let mut metrics = RawMetrics::new();
    metrics.insert("has_security_md".into(), root.join("SECURITY.md").is_file().into());
    metrics.insert(
        "has_github_security_policy".into(),
        root.join(".github").join("SECURITY.md").is_file().into(),
    );
    metrics.insert(
        "has_dependabot".into(),
        (root.join(".github").join("dependabot.yml").is_file()
            || workflows.iter().any(|w| w.contains("dependabot")))
        .into(),
    );
    metrics.insert(
        "has_code_scanning".into(),
        workflows
            .iter()
            .any(|w| w.contains("codeql") || w.contains("security-events"))
            .into(),
    );
    metrics
}

impl Analyzer for SecurityPosture {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Security
    }

    fn applicable(&self, _workspace: &Workspace) -> bool {
        // Every repository has a posture, even if the baseline one.
        true
    }

    fn budget_secs(&self) -> u64 {
        60
    }

    fn collect(&self, workspace: &Workspace, _budget: Duration) -> Signal {
        Signal::Metrics(inspect(workspace.path()))
    }
}
