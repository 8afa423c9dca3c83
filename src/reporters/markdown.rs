//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - GitHub wikis
//! - Documentation

use crate::models::{AnalyzerStatus, Report};
use anyhow::Result;
use chrono::{TimeZone, Utc};

/// Render report as GitHub-flavored Markdown
pub fn render(report: &Report) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    if report.is_fatal() {
        md.push_str("## Errors\n\n");
        for error in &report.errors {
            md.push_str(&format!("- {}\n", error));
        }
        return Ok(md);
    }

    md.push_str(&render_categories(report));
    md.push('\n');
    md.push_str(&render_analyzers(report));

    if !report.warnings.is_empty() {
        md.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            md.push_str(&format!("- {}\n", warning));
        }
    }

    Ok(md)
}

fn render_header(report: &Report) -> String {
    let grade_emoji = match report.grade.as_str() {
        "A" => "🏆",
        "B" => "⭐",
        "C" => "⚠️",
        "D" => "❌",
        "F" => "💀",
        _ => "❓",
    };

    let generated = Utc
        .timestamp_opt(report.timestamp, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| report.timestamp.to_string());

    format!(
        r#"# {} Repograde Report

**Repository:** {}

**Grade: {}** | **Score: {:.1}/100**

Generated: {}
"#,
        grade_emoji, report.repository, report.grade, report.composite_score, generated
    )
}

fn render_categories(report: &Report) -> String {
    let mut md = String::from("## Category Scores\n\n");
    md.push_str("| Category | Score | Measured |\n");
    md.push_str("|----------|-------|----------|\n");
    for category in &report.categories {
        md.push_str(&format!(
            "| {} | {:.1} | {} |\n",
            category.category,
            category.score,
            if category.defaulted { "no (defaulted)" } else { "yes" }
        ));
    }
    md
}

fn status_label(status: AnalyzerStatus) -> &'static str {
    match status {
        AnalyzerStatus::Ok => "✅ ok",
        AnalyzerStatus::NoSignal => "➖ no signal",
        AnalyzerStatus::Error => "❌ error",
        AnalyzerStatus::Timeout => "⏱️ timeout",
    }
}

fn render_analyzers(report: &Report) -> String {
    let mut md = String::from("## Analyzers\n\n");
    md.push_str("| Analyzer | Status | Score | Time (ms) | Detail |\n");
    md.push_str("|----------|--------|-------|-----------|--------|\n");
    for result in &report.results {
        let score = result
            .score
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            result.kind,
            status_label(result.status),
            score,
            result.duration_ms,
            result.message.as_deref().unwrap_or("")
        ));
    }
    md
}
