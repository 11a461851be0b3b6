//! Reconciliation planner - compares a record against the fleet target.

use crate::error::{FleetError, Result};
use crate::types::{FleetTarget, RepositoryRecord};
use crate::vcs::Vcs;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// What to do with the checked-out branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BranchAction {
    None,
    /// The target branch exists locally
    Switch,
    /// The target branch has to be created at HEAD
    Create,
}

/// What to do with one version declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatchAction {
    None,
    Patch,
}

/// Planned changes for one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub branch: BranchAction,
    pub version: PatchAction,
    pub parent_version: PatchAction,
}

impl Plan {
    /// A plan that changes nothing
    pub fn noop() -> Self {
        Self {
            branch: BranchAction::None,
            version: PatchAction::None,
            parent_version: PatchAction::None,
        }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::noop()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return write!(f, "up to date");
        }
        let mut parts = Vec::new();
        match self.branch {
            BranchAction::Switch => parts.push("switch branch"),
            BranchAction::Create => parts.push("create branch"),
            BranchAction::None => {}
        }
        if self.version == PatchAction::Patch {
            parts.push("patch version");
        }
        if self.parent_version == PatchAction::Patch {
            parts.push("patch parent version");
        }
        write!(f, "{}", parts.join(", "))
    }
}

fn patch_action(target: &str, declared: &str) -> PatchAction {
    if !target.is_empty() && target != declared {
        PatchAction::Patch
    } else {
        PatchAction::None
    }
}

/// Whether the record is already on the target branch (or no branch is wanted)
pub fn branch_satisfied(record: &RepositoryRecord, target: &FleetTarget) -> bool {
    target.branch.is_empty() || target.branch == record.branch
}

/// Plan without touching the VCS.
///
/// The branch action is `None` when already satisfied and `Switch` otherwise;
/// [`plan`] refines it into `Switch` or `Create`.
pub fn plan_versions(record: &RepositoryRecord, target: &FleetTarget) -> Plan {
    Plan {
        branch: if branch_satisfied(record, target) {
            BranchAction::None
        } else {
            BranchAction::Switch
        },
        version: patch_action(&target.version, &record.version),
        parent_version: patch_action(&target.parent_version, &record.parent_version),
    }
}

/// Full plan for one repository.
///
/// Asks the VCS whether the target branch exists only when a branch change is
/// needed.
pub fn plan(
    record: &RepositoryRecord,
    target: &FleetTarget,
    vcs: &dyn Vcs,
    repo_dir: &Path,
) -> Result<Plan> {
    let mut plan = plan_versions(record, target);
    if plan.branch == BranchAction::None {
        return Ok(plan);
    }

    let exists = vcs
        .branch_exists(repo_dir, &target.branch)
        .map_err(|source| FleetError::BranchSwitch {
            repo: record.name.clone(),
            branch: target.branch.clone(),
            source,
        })?;
    plan.branch = if exists {
        BranchAction::Switch
    } else {
        BranchAction::Create
    };
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::mock::MockVcs;

    fn record(branch: &str, version: &str, parent: &str) -> RepositoryRecord {
        RepositoryRecord {
            branch: branch.into(),
            version: version.into(),
            version_line: 7,
            parent_version: parent.into(),
            parent_version_line: 4,
            ..RepositoryRecord::new("svc-a")
        }
    }

    fn target(branch: &str, version: &str, parent: &str) -> FleetTarget {
        FleetTarget {
            branch: branch.into(),
            version: version.into(),
            parent_version: parent.into(),
            ..FleetTarget::default()
        }
    }

    #[test]
    fn test_same_branch_needs_no_vcs_call() {
        let vcs = MockVcs::new().with_repo("svc-a", "main", &[]);
        let rec = record("main", "1.0.0", "3.1.0");

        let plan = plan(&rec, &target("main", "", ""), &vcs, Path::new("/w/svc-a")).unwrap();

        assert!(plan.is_noop());
        assert!(vcs.calls_for("svc-a").is_empty());
    }

    #[test]
    fn test_empty_target_is_noop() {
        let vcs = MockVcs::new();
        let rec = record("main", "1.0.0", "3.1.0");

        let plan = plan(&rec, &FleetTarget::default(), &vcs, Path::new("/w/svc-a")).unwrap();

        assert!(plan.is_noop());
        assert!(vcs.calls_for("svc-a").is_empty());
    }

    #[test]
    fn test_switch_or_create() {
        let vcs = MockVcs::new().with_repo("svc-a", "main", &["release-2"]);
        let rec = record("main", "1.0.0", "3.1.0");
        let dir = Path::new("/w/svc-a");

        let existing = plan(&rec, &target("release-2", "", ""), &vcs, dir).unwrap();
        assert_eq!(existing.branch, BranchAction::Switch);

        let missing = plan(&rec, &target("release-3", "", ""), &vcs, dir).unwrap();
        assert_eq!(missing.branch, BranchAction::Create);

        assert_eq!(vcs.calls_for("svc-a"), ["branch_exists", "branch_exists"]);
    }

    #[test]
    fn test_existence_check_failure() {
        let vcs = MockVcs::new()
            .with_repo("svc-a", "main", &[])
            .failing("svc-a", "branch_exists");
        let rec = record("main", "1.0.0", "3.1.0");

        let err = plan(&rec, &target("dev", "", ""), &vcs, Path::new("/w/svc-a")).unwrap_err();

        assert!(matches!(err, FleetError::BranchSwitch { ref branch, .. } if branch == "dev"));
        assert_eq!(err.repo(), Some("svc-a"));
    }

    #[test]
    fn test_version_actions() {
        let rec = record("main", "1.0.0", "3.1.0");

        let plan = plan_versions(&rec, &target("", "1.1.0", "3.1.0"));
        assert_eq!(plan.branch, BranchAction::None);
        assert_eq!(plan.version, PatchAction::Patch);
        assert_eq!(plan.parent_version, PatchAction::None);

        let plan = plan_versions(&rec, &target("", "", "3.2.0"));
        assert_eq!(plan.version, PatchAction::None);
        assert_eq!(plan.parent_version, PatchAction::Patch);
    }

    #[test]
    fn test_target_equal_to_record_is_noop() {
        let rec = record("develop", "1.0.0-SNAPSHOT", "3.1.0");
        let plan = plan_versions(&rec, &target("develop", "1.0.0-SNAPSHOT", "3.1.0"));
        assert!(plan.is_noop());
        assert_eq!(plan.to_string(), "up to date");
    }

    #[test]
    fn test_plan_display() {
        let plan = Plan {
            branch: BranchAction::Create,
            version: PatchAction::Patch,
            parent_version: PatchAction::None,
        };
        assert_eq!(plan.to_string(), "create branch, patch version");
    }
}
