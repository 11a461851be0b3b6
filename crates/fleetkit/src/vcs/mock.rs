//! In-memory VCS for engine tests.

use crate::error::ProcessError;
use crate::vcs::Vcs;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    pub branch: String,
    pub branches: HashSet<String>,
    pub dirty: bool,
    pub commits: Vec<String>,
}

/// Repositories are keyed by the final component of their directory.
#[derive(Default)]
pub struct MockVcs {
    repos: Mutex<HashMap<String, MockRepo>>,
    failing: Mutex<HashSet<(String, &'static str)>>,
    calls: Mutex<Vec<(String, &'static str)>>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(self, name: &str, branch: &str, others: &[&str]) -> Self {
        let mut branches: HashSet<String> = others.iter().map(|b| (*b).to_string()).collect();
        branches.insert(branch.to_string());
        self.repos.lock().unwrap().insert(
            name.to_string(),
            MockRepo {
                branch: branch.to_string(),
                branches,
                ..MockRepo::default()
            },
        );
        self
    }

    /// Make `op` fail for `name` (op names match the trait methods).
    pub fn failing(self, name: &str, op: &'static str) -> Self {
        self.failing.lock().unwrap().insert((name.to_string(), op));
        self
    }

    pub fn repo(&self, name: &str) -> MockRepo {
        self.repos.lock().unwrap().get(name).cloned().unwrap_or_default()
    }

    pub fn set_dirty(&self, name: &str, dirty: bool) {
        if let Some(repo) = self.repos.lock().unwrap().get_mut(name) {
            repo.dirty = dirty;
        }
    }

    pub fn calls_for(&self, name: &str) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(repo, _)| repo == name)
            .map(|(_, op)| *op)
            .collect()
    }

    fn enter(&self, repo_dir: &Path, op: &'static str) -> Result<String, ProcessError> {
        let name = repo_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((name.clone(), op));
        if self.failing.lock().unwrap().contains(&(name.clone(), op)) {
            return Err(ProcessError {
                command: format!("mock {op}"),
                stderr: format!("{op} failed in {name}"),
                exit_code: Some(128),
            });
        }
        Ok(name)
    }

    fn with<T>(&self, name: &str, f: impl FnOnce(&mut MockRepo) -> T) -> T {
        let mut repos = self.repos.lock().unwrap();
        f(repos.entry(name.to_string()).or_default())
    }
}

impl Vcs for MockVcs {
    fn current_branch(&self, repo_dir: &Path) -> Result<String, ProcessError> {
        let name = self.enter(repo_dir, "current_branch")?;
        Ok(self.with(&name, |r| r.branch.clone()))
    }

    fn branch_exists(&self, repo_dir: &Path, branch: &str) -> Result<bool, ProcessError> {
        let name = self.enter(repo_dir, "branch_exists")?;
        Ok(self.with(&name, |r| r.branches.contains(branch)))
    }

    fn switch_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError> {
        let name = self.enter(repo_dir, "switch_branch")?;
        self.with(&name, |r| r.branch = branch.to_string());
        Ok(())
    }

    fn create_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError> {
        let name = self.enter(repo_dir, "create_branch")?;
        self.with(&name, |r| {
            r.branches.insert(branch.to_string());
            r.branch = branch.to_string();
        });
        Ok(())
    }

    fn status(&self, repo_dir: &Path) -> Result<String, ProcessError> {
        let name = self.enter(repo_dir, "status")?;
        Ok(self.with(&name, |r| {
            if r.dirty {
                " M pom.xml".to_string()
            } else {
                String::new()
            }
        }))
    }

    fn stage(&self, repo_dir: &Path, _file: &str) -> Result<(), ProcessError> {
        self.enter(repo_dir, "stage").map(drop)
    }

    fn commit(&self, repo_dir: &Path, message: &str) -> Result<(), ProcessError> {
        let name = self.enter(repo_dir, "commit")?;
        self.with(&name, |r| {
            r.commits.push(message.to_string());
            r.dirty = false;
        });
        Ok(())
    }
}
