//! Core types for fleet state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Collected and declared state of one repository checkout
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRecord {
    /// Directory name, unique within a snapshot
    pub name: String,
    /// Checked-out branch
    pub branch: String,
    /// Working tree has uncommitted changes
    pub dirty: bool,
    /// Operator opt-in; unselected repositories are skipped by every pass
    pub selected: bool,
    /// Declared project version
    pub version: String,
    /// 1-based descriptor line of `version` (0 = unknown)
    pub version_line: usize,
    /// Declared parent version
    pub parent_version: String,
    /// 1-based descriptor line of `parent_version` (0 = unknown)
    pub parent_version_line: usize,
}

impl RepositoryRecord {
    /// A freshly discovered, selected repository with nothing collected yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: true,
            ..Self::default()
        }
    }

    /// Name with a display prefix removed
    pub fn display_name<'a>(&'a self, prefix: &str) -> &'a str {
        if prefix.is_empty() {
            return &self.name;
        }
        self.name.strip_prefix(prefix).unwrap_or(&self.name)
    }
}

/// Desired state shared by every repository in the fleet.
///
/// Empty fields request no change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetTarget {
    pub branch: String,
    pub version: String,
    pub parent_version: String,
    /// Display-only prefix stripped from repository names
    pub name_prefix: String,
}

impl FleetTarget {
    /// True when no field would cause a change
    pub fn is_empty(&self) -> bool {
        self.branch.is_empty() && self.version.is_empty() && self.parent_version.is_empty()
    }
}

/// What changed when merging a discovery result into a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Persisted fleet state: every known repository plus the target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(default)]
    pub repos: Vec<RepositoryRecord>,
    #[serde(default)]
    pub target: FleetTarget,
    /// Last time the snapshot was saved
    pub last_updated: DateTime<Utc>,
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            target: FleetTarget::default(),
            last_updated: Utc::now(),
        }
    }
}

impl FleetSnapshot {
    /// Reconcile the record list with the names found on disk.
    ///
    /// New names are added as selected; records whose directory is gone are
    /// dropped. Existing records keep their collected state and selection.
    pub fn merge_discovered(&mut self, names: &[String]) -> MergeSummary {
        let found: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut summary = MergeSummary::default();

        self.repos.retain(|r| {
            let keep = found.contains(r.name.as_str());
            if !keep {
                summary.removed.push(r.name.clone());
            }
            keep
        });

        for name in names {
            if self.find(name).is_none() {
                self.repos.push(RepositoryRecord::new(name.clone()));
                summary.added.push(name.clone());
            }
        }

        summary
    }

    /// Stable ordering for display and persistence
    pub fn sort_by_name(&mut self) {
        self.repos.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn find(&self, name: &str) -> Option<&RepositoryRecord> {
        self.repos.iter().find(|r| r.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut RepositoryRecord> {
        self.repos.iter_mut().find(|r| r.name == name)
    }

    /// Set the selection flag on the named repositories.
    ///
    /// Returns the names that are not part of the snapshot.
    pub fn select(&mut self, names: &[String], selected: bool) -> Vec<String> {
        let mut unknown = Vec::new();
        for name in names {
            match self.find_mut(name) {
                Some(repo) => repo.selected = selected,
                None => unknown.push(name.clone()),
            }
        }
        unknown
    }

    pub fn select_all(&mut self, selected: bool) {
        for repo in &mut self.repos {
            repo.selected = selected;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.repos.iter().filter(|r| r.selected).count()
    }

    /// Update the `last_updated` timestamp
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
