//! Analyzer adapters
//!
//! Each adapter wraps one analysis technique behind the same contract: an
//! applicability predicate over the workspace and a raw-metric collection
//! step bounded by a timeout. Every failure mode is encoded in the returned
//! [`Signal`]; adapters never propagate errors to the orchestrator, and
//! they read the workspace strictly read-only (they run concurrently
//! against the same directory).

pub mod complexity;
pub mod dependency;
pub mod documentation;
pub mod lint_js;
pub mod lint_python;
pub mod security;
pub mod tool;

use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use std::path::Path;
use std::time::Duration;

/// What one adapter invocation produced.
#[derive(Debug)]
pub enum Signal {
    /// Usable raw metrics, ready for normalization.
    Metrics(RawMetrics),
    /// Nothing applicable to evaluate (reason attached).
    Skip(String),
    /// Tool missing, tool crashed, or output unparseable.
    Fail(String),
    /// External tool was killed at its deadline.
    TimedOut(String),
}

/// Uniform contract for one analysis technique.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;

    /// Cheap predicate; when false the orchestrator records no-signal
    /// without invoking any external tool.
    fn applicable(&self, workspace: &Workspace) -> bool;

    /// Collect raw metrics within `budget`. Must not mutate the workspace.
    fn collect(&self, workspace: &Workspace, budget: Duration) -> Signal;

    /// Per-adapter budget ceiling in seconds; the orchestrator caps it by
    /// the configured global limit.
    fn budget_secs(&self) -> u64 {
        120
    }
}

/// The fixed analyzer set, in report order.
pub fn default_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(lint_python::LintPython),
        Box::new(lint_js::LintJs),
        Box::new(complexity::CyclomaticComplexity),
        Box::new(documentation::Documentation),
        Box::new(dependency::DependencyHygiene),
        Box::new(security::SecurityPosture),
    ]
}

/// True when the workspace contains at least one file with one of the
/// given extensions. Gitignore-aware, skips hidden directories.
pub(crate) fn has_file_with_extension(root: &Path, extensions: &[&str]) -> bool {
    let walker = ignore::WalkBuilder::new(root).build();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalyzerKind;

    #[test]
    fn test_default_set_covers_every_kind_once() {
        let analyzers = default_analyzers();
        let mut kinds: Vec<_> = analyzers.iter().map(|a| a.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), AnalyzerKind::ALL.len());
    }

    #[test]
    fn test_has_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        assert!(!has_file_with_extension(dir.path(), &["py"]));
        std::fs::write(dir.path().join("b.py"), "x = 1\n").unwrap();
        assert!(has_file_with_extension(dir.path(), &["py"]));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("App.PY"), "x = 1\n").unwrap();
        assert!(has_file_with_extension(dir.path(), &["py"]));
    }
}
