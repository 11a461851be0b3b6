//! Version-control abstraction.
//!
//! The [`Vcs`] trait is the narrow command surface the engine depends on,
//! allowing for different implementations (real `git` CLI, mock for testing).

pub mod git;
#[cfg(test)]
pub mod mock;

use crate::error::ProcessError;
use std::path::Path;

pub use git::GitBackend;

/// VCS operations used by collection, reconciliation and commit passes.
///
/// Every method addresses one working tree by directory.
pub trait Vcs: Send + Sync {
    /// Name of the checked-out branch.
    fn current_branch(&self, repo_dir: &Path) -> Result<String, ProcessError>;

    /// Whether a local branch with this name exists.
    ///
    /// A query that answered "no such branch" is `Ok(false)`; a query that
    /// could not run or failed for any other reason is an error.
    fn branch_exists(&self, repo_dir: &Path, branch: &str) -> Result<bool, ProcessError>;

    /// Switch the working tree to an existing branch.
    fn switch_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError>;

    /// Create a branch at HEAD and switch to it.
    fn create_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError>;

    /// Short status listing; empty when the working tree is clean.
    fn status(&self, repo_dir: &Path) -> Result<String, ProcessError>;

    /// Stage a single file.
    fn stage(&self, repo_dir: &Path, file: &str) -> Result<(), ProcessError>;

    /// Commit the index with a message.
    fn commit(&self, repo_dir: &Path, message: &str) -> Result<(), ProcessError>;

    /// Whether the working tree has uncommitted changes.
    fn is_dirty(&self, repo_dir: &Path) -> Result<bool, ProcessError> {
        Ok(!self.status(repo_dir)?.is_empty())
    }
}
