//! Error taxonomy
//!
//! Only acquisition failures and invalid input are fatal. Every analyzer
//! failure mode is absorbed into a status-tagged [`crate::models::AnalyzerResult`]
//! and never propagates as an error.

use thiserror::Error;

/// Fatal failures while materializing the workspace.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The source locator does not look like a retrievable repository.
    #[error("invalid repository source '{0}'")]
    InvalidSource(String),

    /// The remote could not be reached or does not exist.
    #[error("repository unreachable: {0}")]
    Unreachable(String),

    /// The remote rejected our credentials (or asked for some).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The clone did not finish within its time budget.
    #[error("repository clone timed out after {0}s")]
    Timeout(u64),

    /// Workspace directory could not be created or written.
    #[error("workspace io error: {0}")]
    Io(#[from] std::io::Error),
}
