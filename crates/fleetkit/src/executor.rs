//! Reconciliation executor - drives every selected repository toward the target.
//!
//! A pass hands each selected record to its own worker through `par_iter_mut`
//! and returns only after every worker has finished. Inside a worker each
//! sub-step runs even when an earlier one failed; failures are logged and
//! kept on the repository's outcome.

use crate::context::{FleetContext, ProgressCallback};
use crate::descriptor::{self, PatchError};
use crate::error::{FleetError, Result};
use crate::planner::{self, BranchAction, PatchAction, Plan};
use crate::run_log::RunLog;
use crate::types::{FleetTarget, RepositoryRecord};
use rayon::prelude::*;
use std::time::Instant;

/// Default commit message for descriptor updates
pub const DEFAULT_COMMIT_MESSAGE: &str = "update pom version";

/// Result for one repository in a pass
#[derive(Debug)]
pub struct RepoOutcome {
    pub name: String,
    /// `None` for passes that do not plan
    pub plan: Option<Plan>,
    pub errors: Vec<FleetError>,
}

impl RepoOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run log and per-repository outcomes of a pass
#[derive(Debug, Default)]
pub struct FleetReport {
    pub log: Vec<String>,
    pub outcomes: Vec<RepoOutcome>,
}

impl FleetReport {
    pub fn failed(&self) -> impl Iterator<Item = &RepoOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.errors.len()).sum()
    }

    /// Repositories whose plan asked for at least one change
    pub fn changed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.plan.is_some_and(|p| !p.is_noop()))
            .count()
    }
}

pub type ReconcileReport = FleetReport;
pub type CommitReport = FleetReport;

/// Execute `plan` against one repository.
///
/// Steps run in order: branch, version, parent version, dirty refresh. The
/// record is updated only for steps that succeeded.
pub fn apply(
    plan: &Plan,
    record: &mut RepositoryRecord,
    target: &FleetTarget,
    ctx: &FleetContext,
    log: &RunLog,
) -> Vec<FleetError> {
    let mut errors = Vec::new();
    let repo_dir = ctx.repo_dir(&record.name);
    let descriptor_path = ctx.descriptor_path(&record.name);
    let vcs = ctx.vcs();

    if plan.branch != BranchAction::None {
        let start = Instant::now();
        let result = match plan.branch {
            BranchAction::Create => vcs
                .create_branch(&repo_dir, &target.branch)
                .map_err(|source| FleetError::BranchCreate {
                    repo: record.name.clone(),
                    branch: target.branch.clone(),
                    source,
                }),
            _ => vcs
                .switch_branch(&repo_dir, &target.branch)
                .map_err(|source| FleetError::BranchSwitch {
                    repo: record.name.clone(),
                    branch: target.branch.clone(),
                    source,
                }),
        };
        log.timing(&record.name, "git", start.elapsed());
        match result {
            Ok(()) => record.branch = target.branch.clone(),
            Err(e) => errors.push(e),
        }
    }

    if plan.version == PatchAction::Patch {
        let start = Instant::now();
        let result = descriptor::patch_file(
            &descriptor_path,
            record.version_line,
            &record.version,
            &target.version,
        );
        log.timing(&record.name, "ver", start.elapsed());
        match result {
            Ok(()) => record.version = target.version.clone(),
            Err(PatchError::Io(source)) => errors.push(FleetError::VersionPatch {
                repo: record.name.clone(),
                source,
            }),
            Err(PatchError::Stale { found }) => errors.push(FleetError::PatchPositionStale {
                repo: record.name.clone(),
                line: record.version_line,
                expected: record.version.clone(),
                found,
            }),
        }
    }

    if plan.parent_version == PatchAction::Patch {
        let start = Instant::now();
        let result = descriptor::patch_file(
            &descriptor_path,
            record.parent_version_line,
            &record.parent_version,
            &target.parent_version,
        );
        log.timing(&record.name, "pver", start.elapsed());
        match result {
            Ok(()) => record.parent_version = target.parent_version.clone(),
            Err(PatchError::Io(source)) => errors.push(FleetError::ParentVersionPatch {
                repo: record.name.clone(),
                source,
            }),
            Err(PatchError::Stale { found }) => errors.push(FleetError::PatchPositionStale {
                repo: record.name.clone(),
                line: record.parent_version_line,
                expected: record.parent_version.clone(),
                found,
            }),
        }
    }

    for err in &errors {
        log.error(err);
    }
    if let Err(err) = refresh_dirty(record, ctx) {
        log.error(&err);
        errors.push(err);
    }
    errors
}

fn refresh_dirty(record: &mut RepositoryRecord, ctx: &FleetContext) -> Result<()> {
    let dirty = ctx
        .vcs()
        .is_dirty(&ctx.repo_dir(&record.name))
        .map_err(|source| FleetError::StatusQuery {
            repo: record.name.clone(),
            source,
        })?;
    record.dirty = dirty;
    Ok(())
}

/// Plan one record; a failed branch-existence check leaves the branch alone
/// but keeps the version patches.
fn plan_record(
    record: &RepositoryRecord,
    target: &FleetTarget,
    ctx: &FleetContext,
) -> (Plan, Option<FleetError>) {
    let repo_dir = ctx.repo_dir(&record.name);
    match planner::plan(record, target, ctx.vcs(), &repo_dir) {
        Ok(plan) => (plan, None),
        Err(err) => {
            let plan = Plan {
                branch: BranchAction::None,
                ..planner::plan_versions(record, target)
            };
            (plan, Some(err))
        }
    }
}

fn reconcile_one(
    record: &mut RepositoryRecord,
    target: &FleetTarget,
    ctx: &FleetContext,
    log: &RunLog,
) -> RepoOutcome {
    let (plan, planning_error) = plan_record(record, target, ctx);
    let mut errors = Vec::new();
    if let Some(err) = planning_error {
        log.error(&err);
        errors.push(err);
    }
    errors.extend(apply(&plan, record, target, ctx, log));

    RepoOutcome {
        name: record.name.clone(),
        plan: Some(plan),
        errors,
    }
}

/// One worker per selected record; returns outcomes in record order.
fn run_pass<P, F>(
    records: &mut [RepositoryRecord],
    ctx: &FleetContext,
    progress: &P,
    label: &str,
    task: F,
) -> Result<FleetReport>
where
    P: ProgressCallback,
    F: Fn(&mut RepositoryRecord, &RunLog) -> RepoOutcome + Sync,
{
    let selected = records.iter().filter(|r| r.selected).count();
    if selected == 0 {
        return Ok(FleetReport::default());
    }

    let start = Instant::now();
    let log = RunLog::new();
    let pool = ctx.pool(selected, 1)?;
    progress.on_pass_start(label, selected);

    let outcomes: Vec<RepoOutcome> = pool.install(|| {
        records
            .par_iter_mut()
            .filter(|r| r.selected)
            .map(|record| {
                let outcome = task(record, &log);
                progress.on_repo_complete(&outcome.name, outcome.is_success());
                outcome
            })
            .collect()
    });

    progress.on_pass_complete();
    log::info!(
        "{} {} repositories in {}ms",
        label.to_lowercase(),
        selected,
        start.elapsed().as_millis()
    );

    Ok(FleetReport {
        log: log.into_lines(),
        outcomes,
    })
}

/// Reconcile every selected record with the target, then sort by name.
pub fn reconcile_fleet<P: ProgressCallback>(
    records: &mut [RepositoryRecord],
    target: &FleetTarget,
    ctx: &FleetContext,
    progress: &P,
) -> Result<ReconcileReport> {
    let report = run_pass(records, ctx, progress, "Reconciling", |record, log| {
        reconcile_one(record, target, ctx, log)
    })?;
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(report)
}

/// Plan every selected record without changing anything
pub fn preview_fleet(
    records: &[RepositoryRecord],
    target: &FleetTarget,
    ctx: &FleetContext,
) -> Result<Vec<RepoOutcome>> {
    let selected: Vec<&RepositoryRecord> = records.iter().filter(|r| r.selected).collect();
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let pool = ctx.pool(selected.len(), 1)?;
    Ok(pool.install(|| {
        selected
            .par_iter()
            .map(|record| {
                let (plan, planning_error) = plan_record(record, target, ctx);
                RepoOutcome {
                    name: record.name.clone(),
                    plan: Some(plan),
                    errors: planning_error.into_iter().collect(),
                }
            })
            .collect()
    }))
}

fn commit_one(
    record: &mut RepositoryRecord,
    message: &str,
    ctx: &FleetContext,
    log: &RunLog,
) -> RepoOutcome {
    let mut errors = Vec::new();
    let repo_dir = ctx.repo_dir(&record.name);
    let vcs = ctx.vcs();

    let start = Instant::now();
    let result = vcs
        .stage(&repo_dir, &ctx.descriptor)
        .map_err(|source| FleetError::Stage {
            repo: record.name.clone(),
            file: ctx.descriptor.clone(),
            source,
        })
        .and_then(|()| {
            vcs.commit(&repo_dir, message)
                .map_err(|source| FleetError::Commit {
                    repo: record.name.clone(),
                    source,
                })
        });
    log.timing(&record.name, "commit", start.elapsed());
    if let Err(err) = result {
        log.error(&err);
        errors.push(err);
    }

    if let Err(err) = refresh_dirty(record, ctx) {
        log.error(&err);
        errors.push(err);
    }

    RepoOutcome {
        name: record.name.clone(),
        plan: None,
        errors,
    }
}

/// Stage the descriptor and commit it in every selected, dirty record.
///
/// Records whose last collected status is clean are left alone.
pub fn commit_fleet<P: ProgressCallback>(
    records: &mut [RepositoryRecord],
    message: &str,
    ctx: &FleetContext,
    progress: &P,
) -> Result<CommitReport> {
    let start = Instant::now();
    let log = RunLog::new();
    let pending = records.iter().filter(|r| r.selected && r.dirty).count();
    if pending == 0 {
        return Ok(CommitReport::default());
    }

    let pool = ctx.pool(pending, 1)?;
    progress.on_pass_start("Committing", pending);

    let outcomes: Vec<RepoOutcome> = pool.install(|| {
        records
            .par_iter_mut()
            .filter(|r| r.selected && r.dirty)
            .map(|record| {
                let outcome = commit_one(record, message, ctx, &log);
                progress.on_repo_complete(&outcome.name, outcome.is_success());
                outcome
            })
            .collect()
    });

    progress.on_pass_complete();
    log::info!(
        "committed {} repositories in {}ms",
        pending,
        start.elapsed().as_millis()
    );

    Ok(CommitReport {
        log: log.into_lines(),
        outcomes,
    })
}
