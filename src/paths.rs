//! Centralized path and tool resolution for fleetsync
//!
//! Every value can be overridden from the environment, so a fleet root can be
//! driven from scripts without repeating flags.
//!
//! # Environment Variables
//!
//! - `FLEETSYNC_ROOT` - Fleet root directory (default: current directory)
//! - `FLEETSYNC_STATE_DIR` - State directory (default: `<root>/.fleetsync`)
//! - `FLEETSYNC_GIT` - git program (default: `git`)
//! - `FLEETSYNC_JOBS` - Worker limit per pass (default: one worker per repository)
//!
//! Command-line flags take priority over the environment.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the fleet root
pub const ENV_ROOT: &str = "FLEETSYNC_ROOT";

/// Environment variable for the state directory
pub const ENV_STATE_DIR: &str = "FLEETSYNC_STATE_DIR";

/// Environment variable for the git program
pub const ENV_GIT: &str = "FLEETSYNC_GIT";

/// Environment variable for the worker limit
pub const ENV_JOBS: &str = "FLEETSYNC_JOBS";

/// State directory name under the fleet root
pub const STATE_DIR_NAME: &str = ".fleetsync";

/// Snapshot file name inside the state directory
pub const SNAPSHOT_FILE: &str = "snapshot.json";

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get the fleet root directory
///
/// Priority:
/// 1. `--root` flag
/// 2. `FLEETSYNC_ROOT` env var
/// 3. Current directory
pub fn root_dir(flag: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return expand(dir);
    }
    if let Some(dir) = env_value(ENV_ROOT) {
        let path = expand(&dir);
        log::debug!("Using fleet root from {}: {}", ENV_ROOT, path.display());
        return path;
    }
    PathBuf::from(".")
}

/// Get the state directory for a fleet root
///
/// Priority:
/// 1. `FLEETSYNC_STATE_DIR` env var
/// 2. `<root>/.fleetsync`
pub fn state_dir(root: &Path) -> PathBuf {
    if let Some(dir) = env_value(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {}: {}", ENV_STATE_DIR, path.display());
        return path;
    }
    root.join(STATE_DIR_NAME)
}

/// Get the git program
pub fn git_program() -> String {
    match env_value(ENV_GIT) {
        Some(git) => {
            log::debug!("Using git from {ENV_GIT}: {git}");
            expand(&git).to_string_lossy().into_owned()
        }
        None => "git".to_string(),
    }
}

/// Get the worker limit; `None` means one worker per repository
pub fn jobs(flag: Option<usize>) -> Result<Option<usize>> {
    if flag.is_some() {
        return Ok(flag.filter(|j| *j > 0));
    }
    parse_jobs(env_value(ENV_JOBS).as_deref())
}

fn parse_jobs(value: Option<&str>) -> Result<Option<usize>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let jobs: usize = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {ENV_JOBS} value: '{value}'"))?;
    Ok(Some(jobs).filter(|j| *j > 0))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
