//! Run configuration
//!
//! Supports loading config from:
//! - `.repograde.toml` in the working directory
//! - `~/.config/repograde/config.toml`
//!
//! File values override the built-in defaults; CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Composite weight for the Python linter.
pub const DEFAULT_LINT_PYTHON_WEIGHT: f64 = 0.4;
/// Composite weight for the JS/TS linter.
pub const DEFAULT_LINT_JS_WEIGHT: f64 = 0.4;
/// Composite weight for the complexity analyzer.
pub const DEFAULT_COMPLEXITY_WEIGHT: f64 = 0.2;
/// Score reported when every contributing analyzer produced no signal.
pub const DEFAULT_NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub limits: LimitsConfig,
}

/// Weighting policy for the composite score.
///
/// An analyzer's weight applies only when it returned status `ok`; analyzers
/// without signal are zeroed out, never counted as a zero score.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub lint_python_weight: f64,
    pub lint_js_weight: f64,
    pub complexity_weight: f64,
    /// Explicit fallback when the total weight is zero. Never an artifact
    /// of division.
    pub neutral_score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Time budget for the shallow clone, in seconds.
    pub clone_timeout_secs: u64,
    /// Upper bound on any single analyzer's external tool, in seconds.
    pub tool_timeout_secs: u64,
    /// Maximum analyzers in flight at once.
    pub max_in_flight: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lint_python_weight: DEFAULT_LINT_PYTHON_WEIGHT,
            lint_js_weight: DEFAULT_LINT_JS_WEIGHT,
            complexity_weight: DEFAULT_COMPLEXITY_WEIGHT,
            neutral_score: DEFAULT_NEUTRAL_SCORE,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: 300,
            tool_timeout_secs: 120,
            max_in_flight: 4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Config {
    /// Load config, first match wins: `.repograde.toml` in `cwd`, then the
    /// user config dir, then built-in defaults.
    pub fn load(cwd: &Path) -> Self {
        let candidates = [
            Some(cwd.join(".repograde.toml")),
            Self::user_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring malformed config {}: {}", path.display(), e),
                },
                Err(e) => warn!("Ignoring unreadable config {}: {}", path.display(), e),
            }
        }

        Config::default()
    }

    /// Get the user config file path.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repograde").join("config.toml"))
    }

    /// Sample config written by `repograde init`.
    pub fn sample() -> &'static str {
        r#"# repograde configuration

[scoring]
# Composite weights; analyzers without signal are zero-weighted at runtime.
lint_python_weight = 0.4
lint_js_weight = 0.4
complexity_weight = 0.2
# Reported when no contributing analyzer produced signal.
neutral_score = 50.0

[limits]
clone_timeout_secs = 300
tool_timeout_secs = 120
max_in_flight = 4
"#
    }
}
