//! Resolved run settings.
//!
//! Flags, environment and defaults are folded together once at startup; the
//! engine only ever sees the resulting [`FleetContext`].

use crate::cli::Cli;
use crate::paths;
use anyhow::Result;
use fleetkit::descriptor::DEFAULT_FILE_NAME;
use fleetkit::{FleetContext, GitBackend};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Fleet root holding the repository checkouts
    pub root: PathBuf,
    /// Directory for the snapshot file
    pub state_dir: PathBuf,
    /// git program
    pub git: String,
    /// Worker limit per pass
    pub jobs: Option<usize>,
    /// Descriptor file name inside each repository
    pub descriptor: String,
}

impl Settings {
    /// Resolve settings from flags and environment
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let root = paths::root_dir(cli.root.as_deref());
        let settings = Self {
            state_dir: paths::state_dir(&root),
            root,
            git: paths::git_program(),
            jobs: paths::jobs(cli.jobs)?,
            descriptor: cli
                .descriptor
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        };
        log::debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join(paths::SNAPSHOT_FILE)
    }

    /// Build the engine context
    pub fn context(&self) -> FleetContext {
        FleetContext::with_vcs(&self.root, Box::new(GitBackend::new(&self.git)))
            .descriptor(&self.descriptor)
            .jobs(self.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_from_flags() {
        let cli = Cli::try_parse_from([
            "fleetsync",
            "scan",
            "--root",
            "/srv/fleet",
            "--jobs",
            "6",
            "--descriptor",
            "parent.xml",
        ])
        .unwrap();

        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.root, PathBuf::from("/srv/fleet"));
        assert_eq!(settings.jobs, Some(6));
        assert_eq!(settings.descriptor, "parent.xml");
        assert_eq!(
            settings.snapshot_path(),
            settings.state_dir.join("snapshot.json")
        );
    }

    #[test]
    fn test_context_carries_settings() {
        let settings = Settings {
            root: PathBuf::from("/srv/fleet"),
            state_dir: PathBuf::from("/srv/fleet/.fleetsync"),
            git: "git".to_string(),
            jobs: Some(2),
            descriptor: "pom.xml".to_string(),
        };

        let ctx = settings.context();
        assert_eq!(ctx.root, PathBuf::from("/srv/fleet"));
        assert_eq!(ctx.jobs, Some(2));
        assert_eq!(
            ctx.descriptor_path("svc-a"),
            PathBuf::from("/srv/fleet/svc-a/pom.xml")
        );
    }
}
