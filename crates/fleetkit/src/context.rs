//! Fleet context and progress callback.
//!
//! [`FleetContext`] is resolved once at startup and passed down to every
//! pass; nothing in the engine reads process-wide configuration.

use crate::error::Result;
use crate::vcs::{GitBackend, Vcs};
use std::path::PathBuf;

/// Everything a pass needs to address and drive the fleet
pub struct FleetContext {
    /// Directory holding the repository checkouts
    pub root: PathBuf,
    /// Descriptor file name inside each repository
    pub descriptor: String,
    /// Thread limit per pass; `None` gives every concurrent task its own thread
    pub jobs: Option<usize>,
    vcs: Box<dyn Vcs>,
}

impl FleetContext {
    /// Context driving the real `git` program
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_vcs(root, Box::new(GitBackend::default()))
    }

    /// Context with a custom VCS backend (useful for testing)
    pub fn with_vcs(root: impl Into<PathBuf>, vcs: Box<dyn Vcs>) -> Self {
        Self {
            root: root.into(),
            descriptor: crate::descriptor::DEFAULT_FILE_NAME.to_string(),
            jobs: None,
            vcs,
        }
    }

    pub fn descriptor(mut self, file_name: impl Into<String>) -> Self {
        self.descriptor = file_name.into();
        self
    }

    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|j| *j > 0);
        self
    }

    pub fn vcs(&self) -> &dyn Vcs {
        self.vcs.as_ref()
    }

    pub fn repo_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.repo_dir(name).join(&self.descriptor)
    }

    /// Build the worker pool for a pass over `tasks` repositories, each of
    /// which forks `fan_out` concurrent sub-steps.
    ///
    /// A worker blocked in `rayon::join` only gets its sibling closures run
    /// in parallel when other pool threads are idle, so the unbounded pool
    /// holds one thread per sub-step.
    pub(crate) fn pool(&self, tasks: usize, fan_out: usize) -> Result<rayon::ThreadPool> {
        let threads = self.worker_count(tasks, fan_out);
        log::debug!("worker pool: {threads} threads for {tasks} repositories");
        Ok(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
    }

    fn worker_count(&self, tasks: usize, fan_out: usize) -> usize {
        let unbounded = tasks.saturating_mul(fan_out).max(1);
        match self.jobs {
            Some(limit) => limit.min(unbounded),
            None => unbounded,
        }
    }
}

/// Progress callback for fleet passes
///
/// Methods take `&self` because workers report from inside the pool.
pub trait ProgressCallback: Sync {
    /// Called before the first worker starts
    fn on_pass_start(&self, label: &str, count: usize);

    /// Called by a worker when its repository is done
    fn on_repo_complete(&self, name: &str, ok: bool);

    /// Called after the barrier
    fn on_pass_complete(&self);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_pass_start(&self, _label: &str, _count: usize) {}
    fn on_repo_complete(&self, _name: &str, _ok: bool) {}
    fn on_pass_complete(&self) {}
}
