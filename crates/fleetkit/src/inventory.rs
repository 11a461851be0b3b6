//! Repository inventory - lists checkouts under the fleet root.

use crate::error::{FleetError, Result};
use std::fs;
use std::path::Path;

/// Names of the immediate subdirectories of `root` that hold a `.git` directory.
///
/// Order is directory-listing order; callers that need a stable order sort.
pub fn discover(root: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|source| FleetError::Discovery {
        path: root.to_path_buf(),
        source,
    })?;

    let mut repos = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() || !path.join(".git").is_dir() {
            continue;
        }

        repos.push(entry.file_name().to_string_lossy().to_string());
    }

    log::info!("discovered {} repositories in {}", repos.len(), root.display());
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_only_git_dirs() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("svc-a/.git")).unwrap();
        fs::create_dir_all(root.path().join("svc-b/.git")).unwrap();
        fs::create_dir_all(root.path().join("notes")).unwrap();
        // A .git file (worktree link) is not a repository root here
        fs::create_dir_all(root.path().join("linked")).unwrap();
        fs::write(root.path().join("linked/.git"), "gitdir: ../x").unwrap();
        fs::write(root.path().join("README.md"), "fleet").unwrap();

        let mut repos = discover(root.path()).unwrap();
        repos.sort();
        assert_eq!(repos, ["svc-a", "svc-b"]);
    }

    #[test]
    fn test_discover_empty_root() {
        let root = tempfile::tempdir().unwrap();
        assert!(discover(root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");
        let err = discover(&missing).unwrap_err();
        assert!(matches!(err, FleetError::Discovery { ref path, .. } if *path == missing));
    }
}
