//! Error types for fleet operations.
//!
//! Per-repository errors carry the repository name so a pass can keep going
//! and report every failure after the join. Only [`FleetError::Discovery`]
//! is fatal to a run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single external command.
///
/// `exit_code` is `None` when the program could not be spawned or was
/// terminated by a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessError {
    /// The command line that was run
    pub command: String,
    /// Captured standard error (or the spawn error message)
    pub stderr: String,
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "`{}` exited with {}", self.command, code)?,
            None => write!(f, "`{}` did not run to completion", self.command)?,
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, ": {stderr}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProcessError {}

/// Errors raised by discovery, collection, reconciliation and commit passes.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The fleet root could not be listed
    #[error("cannot list repositories under {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bare process failure outside any repository step
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The worker pool for a pass could not be created
    #[error("failed to create worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to get branch for {repo}: {source}")]
    BranchQuery {
        repo: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed to get status for {repo}: {source}")]
    StatusQuery {
        repo: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed to read descriptor {} for {repo}: {source}", path.display())]
    DescriptorRead {
        repo: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Soft failure: the declaration was not found, previous values are kept
    #[error("no {what} declaration found in descriptor for {repo}")]
    DescriptorSearch { repo: String, what: &'static str },

    #[error("failed to switch {repo} to branch {branch}: {source}")]
    BranchSwitch {
        repo: String,
        branch: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed to create branch {branch} in {repo}: {source}")]
    BranchCreate {
        repo: String,
        branch: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed to update version for {repo}: {source}")]
    VersionPatch {
        repo: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update parent version for {repo}: {source}")]
    ParentVersionPatch {
        repo: String,
        #[source]
        source: std::io::Error,
    },

    /// The recorded line no longer holds the expected declaration
    #[error("line {line} of descriptor for {repo} no longer holds {expected:?} (found {found:?})")]
    PatchPositionStale {
        repo: String,
        line: usize,
        expected: String,
        found: String,
    },

    #[error("failed to stage {file} in {repo}: {source}")]
    Stage {
        repo: String,
        file: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed to commit {repo}: {source}")]
    Commit {
        repo: String,
        #[source]
        source: ProcessError,
    },
}

impl FleetError {
    /// Repository this error belongs to, if any.
    pub fn repo(&self) -> Option<&str> {
        match self {
            Self::Discovery { .. } | Self::Process(_) | Self::ThreadPool(_) => None,
            Self::BranchQuery { repo, .. }
            | Self::StatusQuery { repo, .. }
            | Self::DescriptorRead { repo, .. }
            | Self::DescriptorSearch { repo, .. }
            | Self::BranchSwitch { repo, .. }
            | Self::BranchCreate { repo, .. }
            | Self::VersionPatch { repo, .. }
            | Self::ParentVersionPatch { repo, .. }
            | Self::PatchPositionStale { repo, .. }
            | Self::Stage { repo, .. }
            | Self::Commit { repo, .. } => Some(repo),
        }
    }

    /// Whether the error leaves state unchanged without signalling a broken repo.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::DescriptorSearch { .. })
    }
}

/// Result type for fleet operations.
pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn process_error(code: Option<i32>) -> ProcessError {
        ProcessError {
            command: "git switch main".to_string(),
            stderr: "fatal: invalid reference: main\n".to_string(),
            exit_code: code,
        }
    }

    #[test]
    fn test_process_error_display() {
        assert_eq!(
            process_error(Some(128)).to_string(),
            "`git switch main` exited with 128: fatal: invalid reference: main"
        );
        assert_eq!(
            process_error(None).to_string(),
            "`git switch main` did not run to completion: fatal: invalid reference: main"
        );
    }

    #[test]
    fn test_repo_accessor() {
        let err = FleetError::BranchSwitch {
            repo: "svc-a".into(),
            branch: "main".into(),
            source: process_error(Some(1)),
        };
        assert_eq!(err.repo(), Some("svc-a"));

        let err = FleetError::Process(process_error(None));
        assert_eq!(err.repo(), None);
    }

    #[test]
    fn test_soft_errors() {
        let err = FleetError::DescriptorSearch {
            repo: "svc-a".into(),
            what: "version",
        };
        assert!(err.is_soft());
        assert!(
            !FleetError::StatusQuery {
                repo: "svc-a".into(),
                source: process_error(Some(1)),
            }
            .is_soft()
        );
    }
}
