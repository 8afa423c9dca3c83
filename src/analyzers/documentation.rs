//! Documentation adapter
//!
//! Pure workspace inspection, no external tool: finds a README, detects
//! canonical sections by heading, counts fenced code examples, and measures
//! average sentence length as a readability proxy. A repository without a
//! README still produces metrics (and the minimum score), not an error.

use crate::analyzers::{Analyzer, Signal};
use crate::models::{AnalyzerKind, RawMetrics};
use crate::workspace::Workspace;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

const README_NAMES: [&str; 7] = [
    "README.md",
    "README.rst",
    "README.txt",
    "readme.md",
    "Readme.md",
    "readme.txt",
    "README",
];

pub struct Documentation;

struct SectionPatterns {
    installation: Regex,
    usage: Regex,
    contributing: Regex,
    license: Regex,
    code_fence: Regex,
    sentence_end: Regex,
}

fn patterns() -> &'static SectionPatterns {
    static PATTERNS: OnceLock<SectionPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SectionPatterns {
        installation: Regex::new(r"(?m)^#{1,3}[^\n]*instal").expect("valid regex"),
        usage: Regex::new(r"(?m)^#{1,3}[^\n]*us(age|e)").expect("valid regex"),
        contributing: Regex::new(r"(?m)^#{1,3}[^\n]*contribut").expect("valid regex"),
        license: Regex::new(r"(?m)^#{1,3}[^\n]*licens").expect("valid regex"),
        code_fence: Regex::new(r"(?s)```.*?```").expect("valid regex"),
        sentence_end: Regex::new(r"[.!?]+").expect("valid regex"),
    })
}

fn find_readme(root: &Path) -> Option<String> {
    for name in README_NAMES {
        let path = root.join(name);
        if path.is_file() {
            // Lossy read: README encoding is out of our control.
            if let Ok(bytes) = std::fs::read(&path) {
                return Some(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }
    None
}

/// Structural and readability metrics extracted from README text.
pub(crate) fn inspect(content: &str) -> RawMetrics {
    let p = patterns();
    let lower = content.to_lowercase();

    let words = content.split_whitespace().count() as u64;
    let sentences = p.sentence_end.find_iter(content).count() as u64;
    let avg_sentence_length = words as f64 / sentences.max(1) as f64;

    let mut metrics = RawMetrics::new();
    metrics.insert("has_readme".into(), true.into());
    metrics.insert("readme_length".into(), (content.len() as u64).into());
    metrics.insert("has_installation".into(), p.installation.is_match(&lower).into());
    metrics.insert("has_usage".into(), p.usage.is_match(&lower).into());
    metrics.insert("has_contributing".into(), p.contributing.is_match(&lower).into());
    metrics.insert("has_license".into(), p.license.is_match(&lower).into());
    metrics.insert(
        "code_examples".into(),
        (p.code_fence.find_iter(content).count() as u64).into(),
    );
    metrics.insert(
        "avg_sentence_length".into(),
        ((avg_sentence_length * 100.0).round() / 100.0).into(),
    );
    metrics
}

impl Analyzer for Documentation {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Documentation
    }

    fn applicable(&self, _workspace: &Workspace) -> bool {
        // Always applicable: the absence of a README is itself a measurement.
        true
    }

    fn budget_secs(&self) -> u64 {
        60
    }

    fn collect(&self, workspace: &Workspace, _budget: Duration) -> Signal {
        match find_readme(workspace.path()) {
            Some(content) => Signal::Metrics(inspect(&content)),
            None => {
                let mut metrics = RawMetrics::new();
                metrics.insert("has_readme".into(), false.into());
                Signal::Metrics(metrics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "\
# my-tool

A small tool. It does one thing well.

## Installation

```sh
cargo install my-tool
```

## Usage

Run it. Enjoy it.

## License

MIT.
";

    #[test]
    fn test_detects_sections_and_code() {
        let m = inspect(README);
        assert_eq!(m["has_installation"], true);
        assert_eq!(m["has_usage"], true);
        assert_eq!(m["has_license"], true);
        assert_eq!(m["has_contributing"], false);
        assert_eq!(m["code_examples"], 1);
    }

    #[test]
    fn test_sentence_length_short_prose() {
        let m = inspect("One two three. Four five six. Seven eight nine.");
        let avg = m["avg_sentence_length"].as_f64().unwrap();
        assert!((avg - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_giant_sentence_has_no_terminator() {
        // Zero sentence terminators must not divide by zero.
        let text = "word ".repeat(500);
        let m = inspect(&text);
        assert_eq!(m["avg_sentence_length"].as_f64().unwrap(), 500.0);
    }

    #[test]
    fn test_heading_match_requires_line_start() {
        let m = inspect("mentioning installation inline is not a section");
        assert_eq!(m["has_installation"], false);
    }

    #[test]
    fn test_finds_readme_variants() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_readme(dir.path()).is_none());
        std::fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        assert_eq!(find_readme(dir.path()).unwrap(), "# hi");
    }
}
