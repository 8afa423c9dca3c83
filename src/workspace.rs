//! Ephemeral workspace lifecycle
//!
//! One request owns one workspace: a temp directory holding a shallow clone
//! of the target repository. Release is explicit and idempotent; the
//! `TempDir` drop guard backstops every exit path the explicit release
//! cannot reach (panics, early aborts).

use crate::analyzers::tool::run_tool;
use crate::errors::AcquireError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Immutable description of one analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Repository source locator (URL or scp-style git remote).
    pub source: String,
    /// Analyze this local checkout instead of cloning. The directory is
    /// borrowed, never removed.
    pub local_path: Option<PathBuf>,
}

impl AnalysisRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            local_path: None,
        }
    }

    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Reject locators that cannot possibly address a retrievable
    /// repository, before any acquisition is attempted.
    pub fn validate(&self) -> Result<(), AcquireError> {
        if self.local_path.is_some() {
            return Ok(());
        }
        if looks_like_repo_source(&self.source) {
            Ok(())
        } else {
            Err(AcquireError::InvalidSource(self.source.clone()))
        }
    }

    /// Short identifier derived from the locator, e.g. `owner_repo` for a
    /// GitHub URL. Used as the workspace directory prefix.
    pub fn slug(&self) -> String {
        let trimmed = self
            .source
            .trim_end_matches('/')
            .trim_end_matches(".git");
        let path_part = trimmed
            .rsplit_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);
        let path_part = path_part.rsplit_once(':').map(|(_, p)| p).unwrap_or(path_part);

        let mut segments = path_part.split('/').filter(|s| !s.is_empty()).rev();
        let repo = segments.next();
        let owner = segments.next();
        match (owner, repo) {
            (Some(owner), Some(repo)) if !owner.contains('.') => format!("{}_{}", owner, repo),
            (_, Some(repo)) => repo.to_string(),
            _ => "repository".to_string(),
        }
    }
}

/// Loose shape check for a retrievable repository reference.
fn looks_like_repo_source(source: &str) -> bool {
    let source = source.trim();
    if source.is_empty() || source.contains(char::is_whitespace) {
        return false;
    }

    // scp-style: git@host:owner/repo
    if let Some(rest) = source.strip_prefix("git@") {
        return rest
            .split_once(':')
            .map(|(host, path)| host.contains('.') && !path.is_empty())
            .unwrap_or(false);
    }

    for scheme in ["https://", "http://", "git://", "ssh://", "file://"] {
        if let Some(rest) = source.strip_prefix(scheme) {
            return !rest.is_empty() && rest.contains('/');
        }
    }

    false
}

/// A filesystem location exclusively owned by one in-flight request.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    /// Present for ephemeral workspaces until release; its drop guard
    /// removes the directory if `release` was never reached.
    temp: Option<TempDir>,
    borrowed: bool,
}

impl Workspace {
    /// Create an empty ephemeral workspace directory.
    fn ephemeral(prefix: &str) -> Result<Self, AcquireError> {
        let temp = tempfile::Builder::new()
            .prefix(&format!("repograde-{}-", prefix))
            .tempdir()?;
        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
            borrowed: false,
        })
    }

    /// Wrap an existing local checkout. Never removed on release.
    fn borrowed(path: PathBuf) -> Self {
        Self {
            path,
            temp: None,
            borrowed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace content. Idempotent: a second call, or a call
    /// on a borrowed workspace, is a no-op. Returns a warning message when
    /// removal fails; the report carries it, the request never fails on it.
    pub fn release(&mut self) -> Option<String> {
        let temp = self.temp.take()?;
        match temp.close() {
            Ok(()) => {
                debug!("Released workspace {}", self.path.display());
                None
            }
            Err(e) => {
                let msg = format!("failed to clean up workspace {}: {}", self.path.display(), e);
                warn!("{}", msg);
                Some(msg)
            }
        }
    }

    /// True once the backing directory has been handed off for removal (or
    /// the workspace was borrowed and there is nothing to remove).
    pub fn is_released(&self) -> bool {
        self.temp.is_none()
    }
}

/// Acquires workspaces within a bounded time budget.
pub struct WorkspaceManager {
    clone_budget: Duration,
}

impl WorkspaceManager {
    pub fn new(clone_budget: Duration) -> Self {
        Self { clone_budget }
    }

    /// Materialize the request's repository into a workspace.
    ///
    /// A partially acquired workspace (clone failed after the directory was
    /// created) is released before the error returns.
    pub fn acquire(&self, request: &AnalysisRequest) -> Result<Workspace, AcquireError> {
        request.validate()?;

        if let Some(local) = &request.local_path {
            if !local.is_dir() {
                return Err(AcquireError::InvalidSource(format!(
                    "{} is not a directory",
                    local.display()
                )));
            }
            debug!("Using borrowed workspace at {}", local.display());
            return Ok(Workspace::borrowed(local.clone()));
        }

        let mut workspace = Workspace::ephemeral(&request.slug())?;
        info!(
            "Cloning {} into {}",
            request.source,
            workspace.path().display()
        );

        let cmd = vec![
            "git".to_string(),
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "--quiet".to_string(),
            request.source.clone(),
            workspace.path().to_string_lossy().into_owned(),
        ];
        let out = run_tool(&cmd, "git clone", self.clone_budget, None);

        let failure = if out.timed_out {
            Some(AcquireError::Timeout(self.clone_budget.as_secs()))
        } else if let Some(err) = out.error {
            Some(AcquireError::Unreachable(err))
        } else if !out.success() {
            Some(classify_clone_failure(&out.stderr))
        } else {
            None
        };

        if let Some(err) = failure {
            // Release whatever partial state the clone left behind.
            workspace.release();
            return Err(err);
        }

        Ok(workspace)
    }
}

/// Map git's stderr onto the acquisition taxonomy.
fn classify_clone_failure(stderr: &str) -> AcquireError {
    let detail = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("git clone failed")
        .trim()
        .to_string();

    let lower = stderr.to_lowercase();
    if lower.contains("authentication failed")
        || lower.contains("could not read username")
        || lower.contains("could not read password")
        || lower.contains("permission denied")
        || lower.contains("403")
    {
        AcquireError::Auth(detail)
    } else {
        AcquireError::Unreachable(detail)
    }
}
