//! Analyze command implementation
//!
//! Loads config, applies CLI overrides, runs the pipeline against the
//! requested repository, and renders the report. Exits non-zero when the
//! request itself failed (invalid locator or unreachable repository);
//! individual analyzer failures never fail the command.

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::reporters;
use crate::workspace::AnalysisRequest;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

#[allow(clippy::too_many_arguments)]
pub fn run(
    url: &str,
    local_path: Option<&Path>,
    format: &str,
    output_path: Option<&Path>,
    jobs: Option<usize>,
    tool_timeout: Option<u64>,
    clone_timeout: Option<u64>,
) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut config = Config::load(&cwd);
    if let Some(jobs) = jobs {
        config.limits.max_in_flight = jobs;
    }
    if let Some(secs) = tool_timeout {
        config.limits.tool_timeout_secs = secs;
    }
    if let Some(secs) = clone_timeout {
        config.limits.clone_timeout_secs = secs;
    }
    debug!(
        "Effective limits: clone {}s, tool {}s, {} in flight",
        config.limits.clone_timeout_secs,
        config.limits.tool_timeout_secs,
        config.limits.max_in_flight
    );

    let mut request = AnalysisRequest::new(url);
    if let Some(path) = local_path {
        request = request.with_local_path(path);
    }

    let report = Pipeline::new(config).run(&request);
    let rendered = reporters::report(&report, format)?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if report.is_fatal() {
        anyhow::bail!("analysis failed: {}", report.errors.join("; "));
    }
    Ok(())
}
