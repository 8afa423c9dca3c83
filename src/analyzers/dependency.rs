//! Dependency-hygiene adapter
//!
//! Filesystem-level presence checks for declared manifest, lockfile, and
//! security-scanning marker files at the workspace root.

use crate::analyzers::{Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use std::path::Path;
use std::time::Duration;

/// Manifest files, one metric key each.
const MANIFESTS: [(&str, &str); 6] = [
    ("has_package_json", "package.json"),
    ("has_requirements_txt", "requirements.txt"),
    ("has_pipfile", "Pipfile"),
    ("has_setup_py", "setup.py"),
    ("has_cargo_toml", "Cargo.toml"),
    ("has_go_mod", "go.mod"),
];

const LOCKFILES: [&str; 6] = [
    "package-lock.json",
    "yarn.lock",
    "Pipfile.lock",
    "Cargo.lock",
    "go.sum",
    "poetry.lock",
];

const SECURITY_CONFIG: [&str; 3] = [".snyk", "SECURITY.md", ".github/dependabot.yml"];

pub struct DependencyHygiene;

pub(crate) fn inspect(root: &Path) -> RawMetrics {
    let mut metrics = RawMetrics::new();
    let mut manifests = 0u64;
    for (key, file) in MANIFESTS {
        let present = root.join(file).is_file();
        metrics.insert(key.into(), present.into());
        if present {
            manifests += 1;
        }
    }
    metrics.insert("manifest_count".into(), manifests.into());
    metrics.insert(
        "has_lockfiles".into(),
        LOCKFILES.iter().any(|f| root.join(f).is_file()).into(),
    );
    metrics.insert(
        "has_security_config".into(),
        SECURITY_CONFIG.iter().any(|f| root.join(f).is_file()).into(),
    );
    metrics
}

impl Analyzer for DependencyHygiene {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Dependency
    }

    fn applicable(&self, _workspace: &Workspace) -> bool {
        // A bare repository is a valid measurement (score 0).
        true
    }

    fn budget_secs(&self) -> u64 {
        60
    }

    fn collect(&self, workspace: &Workspace, _budget: Duration) -> Signal {
        Signal::Metrics(inspect(workspace.path()))
    }
}
