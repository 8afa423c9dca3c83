//! Text (terminal) reporter with colors and formatting

use crate::models::{AnalyzerStatus, Report};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

/// Status colors
fn status_color(status: AnalyzerStatus) -> &'static str {
    match status {
        AnalyzerStatus::Ok => "\x1b[32m",       // Green
        AnalyzerStatus::NoSignal => "\x1b[90m", // Gray
        AnalyzerStatus::Error => "\x1b[31m",    // Red
        AnalyzerStatus::Timeout => "\x1b[33m",  // Yellow
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn format_score(score: f64) -> String {
    let color = match score {
        s if s >= 80.0 => "\x1b[32m",
        s if s >= 60.0 => "\x1b[33m",
        _ => "\x1b[31m",
    };
    format!("{color}{score:.1}{RESET}")
}

/// Render report as formatted terminal output
pub fn render(report: &Report) -> Result<String> {
    let mut out = String::new();

    // Header
    let grade_c = grade_color(&report.grade);
    out.push_str(&format!("\n{BOLD}Repograde Analysis{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!("Repository: {}\n", report.repository));

    if report.is_fatal() {
        out.push_str(&format!("\n{BOLD}\x1b[31mFAILED{RESET}\n"));
        for error in &report.errors {
            out.push_str(&format!("  {}\n", error));
        }
        return Ok(out);
    }

    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}\n\n",
        report.composite_score, report.grade
    ));

    // Category scores (compact)
    out.push_str(&format!("{BOLD}CATEGORIES{RESET}\n"));
    for category in &report.categories {
        let marker = if category.defaulted {
            format!(" {DIM}(no signal, defaulted){RESET}")
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<16} {}{}\n",
            category.category.to_string(),
            format_score(category.score),
            marker
        ));
    }
    out.push('\n');

    // Per-analyzer breakdown
    out.push_str(&format!("{BOLD}ANALYZERS{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  ANALYZER         STATUS      SCORE    TIME{RESET}\n"
    ));
    for result in &report.results {
        let status_c = status_color(result.status);
        let score = result
            .score
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<16} {status_c}{:<10}{RESET} {:>6}  {:>5} ms\n",
            result.kind.to_string(),
            result.status.to_string(),
            score,
            result.duration_ms
        ));
        if result.status != AnalyzerStatus::Ok {
            if let Some(message) = &result.message {
                out.push_str(&format!("  {DIM}  {}{RESET}\n", message));
            }
        }
    }

    if !report.warnings.is_empty() {
        out.push_str(&format!("\n{BOLD}WARNINGS{RESET}\n"));
        for warning in &report.warnings {
            out.push_str(&format!("  \x1b[33m{}{RESET}\n", warning));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_contains_scores_and_grade() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("65.0/100"));
        assert!(out.contains("Grade"));
        assert!(out.contains("lint-python"));
        assert!(out.contains("no-signal"));
    }

    #[test]
    fn test_text_marks_defaulted_categories() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("defaulted"));
    }

    #[test]
    fn test_text_fatal_report_shows_error_only() {
        let mut report = test_report();
        report.errors.push("repository unreachable: not found".into());
        let out = render(&report).unwrap();
        assert!(out.contains("FAILED"));
        assert!(out.contains("repository unreachable"));
        assert!(!out.contains("CATEGORIES"));
    }

    #[test]
    fn test_text_shows_cleanup_warnings() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("WARNINGS"));
        assert!(out.contains("failed to clean up"));
    }
}
