//! Analysis pipeline
//!
//! Orchestrates one request end to end: acquire the workspace, run every
//! analyzer in bounded parallel, normalize and aggregate, release the
//! workspace, emit the report. Analyzer failures are isolated per slot;
//! the only fatal outcomes are an invalid request and a failed acquisition.

use crate::analyzers::{default_analyzers, Analyzer, Signal};
use crate::config::Config;
use crate::models::{AnalyzerResult, Report};
use crate::scoring::{self, aggregate::aggregate};
use crate::workspace::{AnalysisRequest, Workspace, WorkspaceManager};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Pipeline {
    analyzers: Vec<Box<dyn Analyzer>>,
    config: Config,
}

impl Pipeline {
    /// Pipeline over the full default analyzer set.
    pub fn new(config: Config) -> Self {
        Self {
            analyzers: default_analyzers(),
            config,
        }
    }

    /// Pipeline over an explicit analyzer set.
    pub fn with_analyzers(config: Config, analyzers: Vec<Box<dyn Analyzer>>) -> Self {
        Self { analyzers, config }
    }

    /// Run one request to completion. Always returns a report; a fatal
    /// acquisition failure yields a report carrying the error and no
    /// analyzer results.
    pub fn run(&self, request: &AnalysisRequest) -> Report {
        let started = Instant::now();
        let manager =
            WorkspaceManager::new(Duration::from_secs(self.config.limits.clone_timeout_secs));

        let mut workspace = match manager.acquire(request) {
            Ok(workspace) => workspace,
            Err(e) => {
                warn!("Acquisition failed for {}: {}", request.source, e);
                return self.fatal_report(request, e.to_string());
            }
        };

        let results = self.run_analyzers(&workspace);

        let mut warnings = Vec::new();
        if let Some(msg) = workspace.release() {
            warnings.push(msg);
        }

        let (categories, composite_score) = aggregate(&results, &self.config.scoring);
        info!(
            "Analyzed {} in {} ms, composite {:.1}",
            request.source,
            started.elapsed().as_millis(),
            composite_score
        );

        Report {
            repository: request.source.clone(),
            timestamp: chrono::Utc::now().timestamp(),
            results,
            categories,
            composite_score,
            grade: Report::grade_from_score(composite_score),
            errors: Vec::new(),
            warnings,
        }
    }

    /// Run every analyzer against the workspace, at most
    /// `limits.max_in_flight` concurrently. Slots are independent: the
    /// output has one result per analyzer in registration order no matter
    /// which of them failed.
    fn run_analyzers(&self, workspace: &Workspace) -> Vec<AnalyzerResult> {
        let run_all = || -> Vec<AnalyzerResult> {
            self.analyzers
                .par_iter()
                .map(|analyzer| self.run_one(analyzer.as_ref(), workspace))
                .collect()
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.limits.max_in_flight)
            .build()
        {
            Ok(pool) => pool.install(run_all),
            Err(e) => {
                warn!("Falling back to the global thread pool: {}", e);
                run_all()
            }
        }
    }

    fn run_one(&self, analyzer: &dyn Analyzer, workspace: &Workspace) -> AnalyzerResult {
        let kind = analyzer.kind();
        let started = Instant::now();

        if !analyzer.applicable(workspace) {
            debug!("{} not applicable, skipping", kind);
            return AnalyzerResult::no_signal(
                kind,
                "nothing applicable in this repository",
                started.elapsed().as_millis() as u64,
            );
        }

        let budget = Duration::from_secs(
            analyzer
                .budget_secs()
                .min(self.config.limits.tool_timeout_secs),
        );

        let outcome = catch_unwind(AssertUnwindSafe(|| analyzer.collect(workspace, budget)));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Signal::Metrics(metrics)) => {
                let score = scoring::normalize(kind, &metrics);
                debug!("{} scored {:.1} in {} ms", kind, score, elapsed_ms);
                AnalyzerResult::ok(kind, metrics, score, elapsed_ms)
            }
            Ok(Signal::Skip(reason)) => {
                debug!("{} no signal: {}", kind, reason);
                AnalyzerResult::no_signal(kind, reason, elapsed_ms)
            }
            Ok(Signal::Fail(message)) => {
                warn!("{} failed: {}", kind, message);
                AnalyzerResult::error(kind, message, elapsed_ms)
            }
            Ok(Signal::TimedOut(message)) => {
                warn!("{} timed out: {}", kind, message);
                AnalyzerResult::timeout(kind, message, elapsed_ms)
            }
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("{} panicked: {}", kind, detail);
                AnalyzerResult::error(kind, format!("analyzer panicked: {}", detail), elapsed_ms)
            }
        }
    }

    fn fatal_report(&self, request: &AnalysisRequest, error: String) -> Report {
        let neutral = self.config.scoring.neutral_score;
        Report {
            repository: request.source.clone(),
            timestamp: chrono::Utc::now().timestamp(),
            results: Vec::new(),
            categories: Vec::new(),
            composite_score: neutral,
            grade: Report::grade_from_score(neutral),
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzerKind, AnalyzerStatus, RawMetrics};
    use serde_json::json;

    struct FixedScore {
        kind: AnalyzerKind,
        metrics: RawMetrics,
    }

    impl Analyzer for FixedScore {
        fn kind(&self) -> AnalyzerKind {
            self.kind
        }
        fn applicable(&self, _: &Workspace) -> bool {
            true
        }
        fn collect(&self, _: &Workspace, _: Duration) -> Signal {
            Signal::Metrics(self.metrics.clone())
        }
    }

    struct Panicking;

    impl Analyzer for Panicking {
        fn kind(&self) -> AnalyzerKind {
            AnalyzerKind::Complexity
        }
        fn applicable(&self, _: &Workspace) -> bool {
            true
        }
        fn collect(&self, _: &Workspace, _: Duration) -> Signal {
            panic!("boom");
        }
    }

    struct NotApplicable;

    impl Analyzer for NotApplicable {
        fn kind(&self) -> AnalyzerKind {
            AnalyzerKind::LintJs
        }
        fn applicable(&self, _: &Workspace) -> bool {
            false
        }
        fn collect(&self, _: &Workspace, _: Duration) -> Signal {
            unreachable!("collect must not run when not applicable");
        }
    }

    fn clean_python_metrics() -> RawMetrics {
        [
            ("clean".to_string(), json!(true)),
            ("issues".to_string(), json!(0)),
            ("critical_issues".to_string(), json!(0)),
        ]
        .into_iter()
        .collect()
    }

    fn local_request(dir: &tempfile::TempDir) -> AnalysisRequest {
        AnalysisRequest::new("https://example.com/owner/repo").with_local_path(dir.path())
    }

    #[test]
    fn test_panicking_analyzer_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::with_analyzers(
            Config::default(),
            vec![
                Box::new(FixedScore {
                    kind: AnalyzerKind::LintPython,
                    metrics: clean_python_metrics(),
                }),
                Box::new(Panicking),
            ],
        );

        let report = pipeline.run(&local_request(&dir));
        assert_eq!(report.results.len(), 2);
        assert!(!report.is_fatal());

        let lint = report.analyzer_result(AnalyzerKind::LintPython).unwrap();
        assert_eq!(lint.status, AnalyzerStatus::Ok);
        assert_eq!(lint.score, Some(90.0));

        let complexity = report.analyzer_result(AnalyzerKind::Complexity).unwrap();
        assert_eq!(complexity.status, AnalyzerStatus::Error);
        assert!(complexity.message.as_deref().unwrap().contains("boom"));

        // The surviving analyzer alone carries the composite.
        assert_eq!(report.composite_score, 90.0);
    }

    #[test]
    fn test_not_applicable_records_no_signal_without_running() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::with_analyzers(Config::default(), vec![Box::new(NotApplicable)]);
        let report = pipeline.run(&local_request(&dir));

        let result = report.analyzer_result(AnalyzerKind::LintJs).unwrap();
        assert_eq!(result.status, AnalyzerStatus::NoSignal);
        assert!(result.score.is_none());
    }

    #[test]
    fn test_invalid_source_is_fatal() {
        let pipeline = Pipeline::with_analyzers(Config::default(), vec![]);
        let report = pipeline.run(&AnalysisRequest::new("not a url"));
        assert!(report.is_fatal());
        assert!(report.results.is_empty());
        assert!(report.categories.is_empty());
        assert_eq!(report.composite_score, 50.0);
    }

    #[test]
    fn test_all_slots_present_in_registration_order() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Config::default());
        let report = pipeline.run(&local_request(&dir));

        let kinds: Vec<_> = report.results.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, AnalyzerKind::ALL.to_vec());
    }

    #[test]
    fn test_empty_repository_defaults_composite_to_neutral() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Config::default());
        let report = pipeline.run(&local_request(&dir));

        assert!(!report.is_fatal());
        assert_eq!(report.composite_score, 50.0);
        let code_quality = report
            .category_score(crate::models::Category::CodeQuality)
            .unwrap();
        assert!(code_quality.defaulted);
    }
}
