//! Composite and category aggregation
//!
//! The composite is a weighted mean of the contributing analyzers that
//! actually produced signal. An analyzer that errored, timed out, or had
//! nothing to measure carries zero weight; its absence redistributes weight
//! to the rest instead of dragging the mean down. When all of them are
//! absent the composite is the configured neutral score, flagged as
//! defaulted so a reader can tell a measured 50 from a fallback 50.

use crate::config::ScoringConfig;
use crate::models::{AnalyzerKind, AnalyzerResult, Category, CategoryScore};

fn composite_weight(kind: AnalyzerKind, scoring: &ScoringConfig) -> f64 {
    match kind {
        AnalyzerKind::LintPython => scoring.lint_python_weight,
        AnalyzerKind::LintJs => scoring.lint_js_weight,
        AnalyzerKind::Complexity => scoring.complexity_weight,
        _ => 0.0,
    }
}

fn signal_score(results: &[AnalyzerResult], kind: AnalyzerKind) -> Option<f64> {
    results
        .iter()
        .find(|r| r.kind == kind && r.has_signal())
        .and_then(|r| r.score)
}

/// Weighted composite over the contributing analyzers with signal.
///
/// Returns `(score, defaulted)`; `defaulted` is true when the total weight
/// was zero and `score` is the neutral fallback.
pub fn composite(results: &[AnalyzerResult], scoring: &ScoringConfig) -> (f64, bool) {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for result in results {
        if !result.kind.contributes_to_composite() || !result.has_signal() {
            continue;
        }
        let weight = composite_weight(result.kind, scoring);
        if let Some(score) = result.score {
            weighted_sum += score * weight;
            total_weight += weight;
        }
    }

    if total_weight > 0.0 {
        ((weighted_sum / total_weight).clamp(0.0, 100.0), false)
    } else {
        (scoring.neutral_score, true)
    }
}

fn single_category(
    results: &[AnalyzerResult],
    kind: AnalyzerKind,
    category: Category,
    neutral: f64,
) -> CategoryScore {
    match signal_score(results, kind) {
        Some(score) => CategoryScore {
            category,
            score,
            defaulted: false,
        },
        None => CategoryScore {
            category,
            score: neutral,
            defaulted: true,
        },
    }
}

/// Derive the full category breakdown plus the composite score.
///
/// Categories appear in a fixed order regardless of which analyzers ran,
/// so reports stay structurally stable across runs.
pub fn aggregate(
    results: &[AnalyzerResult],
    scoring: &ScoringConfig,
) -> (Vec<CategoryScore>, f64) {
    let (composite_score, defaulted) = composite(results, scoring);
    let neutral = scoring.neutral_score;

    let categories = vec![
        CategoryScore {
            category: Category::CodeQuality,
            score: composite_score,
            defaulted,
        },
        single_category(results, AnalyzerKind::Documentation, Category::Documentation, neutral),
        single_category(results, AnalyzerKind::Security, Category::Security, neutral),
        single_category(results, AnalyzerKind::Dependency, Category::Dependencies, neutral),
        single_category(results, AnalyzerKind::Complexity, Category::Complexity, neutral),
    ];

    (categories, composite_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawMetrics;

    fn ok(kind: AnalyzerKind, score: f64) -> AnalyzerResult {
        AnalyzerResult::ok(kind, RawMetrics::new(), score, 1)
    }

    #[test]
    fn test_composite_weighted_mean() {
        let results = vec![
            ok(AnalyzerKind::LintPython, 90.0),
            ok(AnalyzerKind::LintJs, 60.0),
            ok(AnalyzerKind::Complexity, 70.0),
        ];
        let (score, defaulted) = composite(&results, &ScoringConfig::default());
        // 0.4*90 + 0.4*60 + 0.2*70 = 74
        assert!((score - 74.0).abs() < 1e-9);
        assert!(!defaulted);
    }

    #[test]
    fn test_missing_analyzer_is_zero_weighted() {
        // Only flake8 ran; its weight renormalizes to the full mean.
        let results = vec![
            ok(AnalyzerKind::LintPython, 90.0),
            AnalyzerResult::no_signal(AnalyzerKind::LintJs, "no JS/TS files", 1),
            AnalyzerResult::error(AnalyzerKind::Complexity, "radon not found on PATH", 1),
        ];
        let (score, defaulted) = composite(&results, &ScoringConfig::default());
        assert_eq!(score, 90.0);
        assert!(!defaulted);
    }

    #[test]
    fn test_all_absent_yields_neutral_default() {
        let results = vec![
            AnalyzerResult::no_signal(AnalyzerKind::LintPython, "no Python files", 1),
            AnalyzerResult::no_signal(AnalyzerKind::LintJs, "no JS/TS files", 1),
            AnalyzerResult::timeout(AnalyzerKind::Complexity, "radon timed out", 1),
        ];
        let (score, defaulted) = composite(&results, &ScoringConfig::default());
        assert_eq!(score, 50.0);
        assert!(defaulted);
    }

    #[test]
    fn test_neutral_score_is_configurable() {
        let scoring = ScoringConfig {
            neutral_score: 65.0,
            ..ScoringConfig::default()
        };
        let (score, defaulted) = composite(&[], &scoring);
        assert_eq!(score, 65.0);
        assert!(defaulted);
    }

    #[test]
    fn test_non_contributing_kinds_never_enter_composite() {
        let results = vec![
            ok(AnalyzerKind::LintPython, 80.0),
            ok(AnalyzerKind::Documentation, 0.0),
            ok(AnalyzerKind::Security, 100.0),
        ];
        let (score, _) = composite(&results, &ScoringConfig::default());
        assert_eq!(score, 80.0);
    }

    #[test]
    fn test_aggregate_category_layout_is_stable() {
        let (categories, _) = aggregate(&[], &ScoringConfig::default());
        let order: Vec<Category> = categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                Category::CodeQuality,
                Category::Documentation,
                Category::Security,
                Category::Dependencies,
                Category::Complexity,
            ]
        );
        assert!(categories.iter().all(|c| c.defaulted));
    }

    #[test]
    fn test_aggregate_measured_categories() {
        let results = vec![
            ok(AnalyzerKind::Documentation, 75.0),
            ok(AnalyzerKind::Dependency, 45.0),
            ok(AnalyzerKind::Security, 30.0),
            ok(AnalyzerKind::Complexity, 90.0),
        ];
        let (categories, composite_score) = aggregate(&results, &ScoringConfig::default());

        let get = |cat: Category| categories.iter().find(|c| c.category == cat).unwrap();
        assert_eq!(get(Category::Documentation).score, 75.0);
        assert_eq!(get(Category::Dependencies).score, 45.0);
        assert_eq!(get(Category::Security).score, 30.0);
        assert_eq!(get(Category::Complexity).score, 90.0);
        assert!(!get(Category::Complexity).defaulted);
        // Complexity alone carries the composite.
        assert_eq!(composite_score, 90.0);
        assert!(!get(Category::CodeQuality).defaulted);
    }
}
