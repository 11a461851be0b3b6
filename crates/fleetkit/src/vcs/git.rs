//! Git backend using the `git` command line.

use crate::error::ProcessError;
use crate::runner::{CommandRunner, SystemRunner};
use crate::vcs::Vcs;
use std::path::Path;

/// Backend that executes real `git` commands.
pub struct GitBackend {
    /// Program name or path of the git executable
    program: String,
    runner: Box<dyn CommandRunner>,
}

impl GitBackend {
    /// Create a backend running `program` through the system runner.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(program, Box::new(SystemRunner))
    }

    /// Create a backend with a custom runner (useful for testing).
    pub fn with_runner(program: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The git program this backend invokes
    pub fn program(&self) -> &str {
        &self.program
    }

    fn git(&self, repo_dir: &Path, args: &[&str]) -> Result<String, ProcessError> {
        self.runner.run_text(&self.program, args, repo_dir)
    }
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new("git")
    }
}

impl Vcs for GitBackend {
    fn current_branch(&self, repo_dir: &Path) -> Result<String, ProcessError> {
        self.git(repo_dir, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn branch_exists(&self, repo_dir: &Path, branch: &str) -> Result<bool, ProcessError> {
        let reference = format!("refs/heads/{branch}");
        match self.git(repo_dir, &["rev-parse", "--verify", "--quiet", &reference]) {
            Ok(_) => Ok(true),
            // `--verify --quiet` exits 1 for a missing ref; anything else is a failure
            Err(e) if e.exit_code == Some(1) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn switch_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError> {
        self.git(repo_dir, &["switch", branch]).map(drop)
    }

    fn create_branch(&self, repo_dir: &Path, branch: &str) -> Result<(), ProcessError> {
        self.git(repo_dir, &["switch", "-c", branch]).map(drop)
    }

    fn status(&self, repo_dir: &Path) -> Result<String, ProcessError> {
        self.git(repo_dir, &["status", "-s"])
    }

    fn stage(&self, repo_dir: &Path, file: &str) -> Result<(), ProcessError> {
        self.git(repo_dir, &["add", file]).map(drop)
    }

    fn commit(&self, repo_dir: &Path, message: &str) -> Result<(), ProcessError> {
        self.git(repo_dir, &["commit", "-m", message]).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted results and records every invocation
    #[derive(Default)]
    struct ScriptedRunner {
        calls: Mutex<Vec<String>>,
        replies: Mutex<VecDeque<Result<Vec<u8>, ProcessError>>>,
    }

    impl ScriptedRunner {
        fn reply(self, result: Result<&str, Option<i32>>) -> Self {
            let result = result.map(|s| s.as_bytes().to_vec()).map_err(|code| ProcessError {
                command: "git".into(),
                stderr: String::new(),
                exit_code: code,
            });
            self.replies.lock().unwrap().push_back(result);
            self
        }
    }

    impl CommandRunner for &'static ScriptedRunner {
        fn run(
            &self,
            program: &str,
            args: &[&str],
            _working_dir: &Path,
        ) -> Result<Vec<u8>, ProcessError> {
            self.calls
                .lock()
                .unwrap()
                .push(crate::runner::command_line(program, args));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn backend(runner: ScriptedRunner) -> (GitBackend, &'static ScriptedRunner) {
        let runner: &'static ScriptedRunner = Box::leak(Box::new(runner));
        (GitBackend::with_runner("git", Box::new(runner)), runner)
    }

    #[test]
    fn test_current_branch_is_trimmed() {
        let (git, runner) = backend(ScriptedRunner::default().reply(Ok("develop\n")));
        assert_eq!(git.current_branch(Path::new(".")).unwrap(), "develop");
        assert_eq!(
            runner.calls.lock().unwrap().as_slice(),
            ["git rev-parse --abbrev-ref HEAD"]
        );
    }

    #[test]
    fn test_branch_exists() {
        let (git, runner) = backend(
            ScriptedRunner::default()
                .reply(Ok("4b825dc642cb6eb9a060e54bf8d69288fbee4904\n"))
                .reply(Err(Some(1)))
                .reply(Err(None))
                .reply(Err(Some(128))),
        );
        let dir = Path::new(".");
        assert!(git.branch_exists(dir, "main").unwrap());
        assert!(!git.branch_exists(dir, "feature/x").unwrap());
        assert!(git.branch_exists(dir, "feature/y").is_err());
        let err = git.branch_exists(dir, "feature/z").unwrap_err();
        assert_eq!(err.exit_code, Some(128));
        assert_eq!(
            runner.calls.lock().unwrap()[1],
            "git rev-parse --verify --quiet refs/heads/feature/x"
        );
    }

    #[test]
    fn test_switch_and_create_commands() {
        let (git, runner) = backend(ScriptedRunner::default());
        let dir = Path::new(".");
        git.switch_branch(dir, "release").unwrap();
        git.create_branch(dir, "release-2").unwrap();
        git.stage(dir, "pom.xml").unwrap();
        git.commit(dir, "update pom version").unwrap();
        assert_eq!(
            runner.calls.lock().unwrap().as_slice(),
            [
                "git switch release",
                "git switch -c release-2",
                "git add pom.xml",
                "git commit -m update pom version",
            ]
        );
    }

    #[test]
    fn test_is_dirty() {
        let (git, _) = backend(
            ScriptedRunner::default()
                .reply(Ok(""))
                .reply(Ok(" M pom.xml\n")),
        );
        let dir = Path::new(".");
        assert!(!git.is_dirty(dir).unwrap());
        assert!(git.is_dirty(dir).unwrap());
    }
}
