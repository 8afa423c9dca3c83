//! CLI command definitions and handlers

mod analyze;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate jobs count (1-64)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("jobs must be at least 1".to_string())
    } else if n > 64 {
        Err("jobs cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Repograde - composite repository quality reports
#[derive(Parser, Debug)]
#[command(name = "repograde")]
#[command(
    version,
    about = "Clone a repository, run independent quality analyzers, and grade the result 0-100",
    after_help = "\
Examples:
  repograde analyze https://github.com/owner/repo     Clone and grade a remote repository
  repograde analyze <url> --format json               JSON output for scripting
  repograde analyze <url> --format md -o report.md    Markdown report to a file
  repograde analyze <url> --path ./checkout           Analyze a local checkout instead of cloning
  repograde init                                      Write a sample .repograde.toml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a repository and print the graded report
    #[command(after_help = "\
Examples:
  repograde analyze https://github.com/owner/repo
  repograde analyze git@github.com:owner/repo.git --format json
  repograde analyze https://github.com/owner/repo --jobs 2 --tool-timeout 60")]
    Analyze {
        /// Repository URL (https, git, ssh, or scp-style git@host:owner/repo)
        url: String,

        /// Analyze this local directory instead of cloning the URL
        #[arg(long)]
        path: Option<PathBuf>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Maximum analyzers in flight at once (1-64)
        #[arg(long, short = 'j', value_parser = parse_jobs)]
        jobs: Option<usize>,

        /// Per-analyzer external tool budget in seconds
        #[arg(long)]
        tool_timeout: Option<u64>,

        /// Shallow clone budget in seconds
        #[arg(long)]
        clone_timeout: Option<u64>,
    },

    /// Write a sample .repograde.toml config file to the current directory
    Init,
}

/// Dispatch a parsed CLI invocation to its command handler.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            url,
            path,
            format,
            output,
            jobs,
            tool_timeout,
            clone_timeout,
        } => analyze::run(
            &url,
            path.as_deref(),
            &format,
            output.as_deref(),
            jobs,
            tool_timeout,
            clone_timeout,
        ),
        Commands::Init => init::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs_bounds() {
        assert_eq!(parse_jobs("1").unwrap(), 1);
        assert_eq!(parse_jobs("64").unwrap(), 64);
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("65").is_err());
        assert!(parse_jobs("lots").is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "repograde",
            "analyze",
            "https://github.com/owner/repo",
            "--format",
            "json",
            "-j",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { url, format, jobs, .. } => {
                assert_eq!(url, "https://github.com/owner/repo");
                assert_eq!(format, "json");
                assert_eq!(jobs, Some(2));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from([
            "repograde",
            "analyze",
            "https://github.com/owner/repo",
            "--format",
            "xml",
        ])
        .is_err());
    }
}
