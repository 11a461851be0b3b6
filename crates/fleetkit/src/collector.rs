//! State collector - refreshes repository records from disk and git.
//!
//! Every selected repository gets its own worker; inside it the branch query,
//! the status query and the descriptor search run side by side. A failure in
//! one of them is logged and returned but never stops the others.

use crate::context::{FleetContext, ProgressCallback};
use crate::descriptor;
use crate::error::{FleetError, Result};
use crate::run_log::RunLog;
use crate::types::RepositoryRecord;
use rayon::prelude::*;
use std::time::Instant;

/// Concurrent sub-fetches per repository: branch, status, descriptor
const SUB_FETCHES: usize = 3;

/// Outcome of a collection pass
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Timing and error lines in completion order
    pub log: Vec<String>,
    /// Every error raised, grouped by repository in record order
    pub errors: Vec<FleetError>,
    /// Number of repositories visited
    pub visited: usize,
}

impl CollectReport {
    /// True when no hard (non-soft) error occurred
    pub fn is_success(&self) -> bool {
        self.errors.iter().all(FleetError::is_soft)
    }
}

/// Refresh one record.
///
/// Fields whose query failed keep their previous values.
pub fn collect(record: &mut RepositoryRecord, ctx: &FleetContext, log: &RunLog) -> Vec<FleetError> {
    let name = record.name.as_str();
    let repo_dir = ctx.repo_dir(name);
    let descriptor_path = ctx.descriptor_path(name);
    let vcs = ctx.vcs();

    let (branch, (dirty, declarations)) = rayon::join(
        || {
            let start = Instant::now();
            let result = vcs.current_branch(&repo_dir);
            if result.is_ok() {
                log.timing(name, "branch", start.elapsed());
            }
            result
        },
        || {
            rayon::join(
                || {
                    let start = Instant::now();
                    let result = vcs.is_dirty(&repo_dir);
                    if result.is_ok() {
                        log.timing(name, "status", start.elapsed());
                    }
                    result
                },
                || {
                    let start = Instant::now();
                    let result = descriptor::read_declarations(&descriptor_path, name);
                    if result.is_ok() {
                        log.timing(name, "descriptor", start.elapsed());
                    }
                    result
                },
            )
        },
    );

    let mut errors = Vec::new();
    let repo = name.to_string();

    match branch {
        Ok(branch) => record.branch = branch,
        Err(source) => errors.push(FleetError::BranchQuery {
            repo: repo.clone(),
            source,
        }),
    }

    match dirty {
        Ok(dirty) => record.dirty = dirty,
        Err(source) => errors.push(FleetError::StatusQuery {
            repo: repo.clone(),
            source,
        }),
    }

    match declarations {
        Ok(found) => {
            match found.version {
                Some(decl) => {
                    record.version = decl.value;
                    record.version_line = decl.line;
                }
                None => errors.push(FleetError::DescriptorSearch {
                    repo: repo.clone(),
                    what: "version",
                }),
            }
            match found.parent_version {
                Some(decl) => {
                    record.parent_version = decl.value;
                    record.parent_version_line = decl.line;
                }
                None => errors.push(FleetError::DescriptorSearch {
                    repo: repo.clone(),
                    what: "parent version",
                }),
            }
        }
        Err(source) => errors.push(FleetError::DescriptorRead {
            repo,
            path: descriptor_path,
            source,
        }),
    }

    for err in &errors {
        log.error(err);
    }
    errors
}

/// Refresh every selected record, one worker per repository.
///
/// Returns after all workers have finished. Record order is untouched.
pub fn collect_fleet<P: ProgressCallback>(
    records: &mut [RepositoryRecord],
    ctx: &FleetContext,
    progress: &P,
) -> Result<CollectReport> {
    let selected = records.iter().filter(|r| r.selected).count();
    if selected == 0 {
        return Ok(CollectReport::default());
    }

    let start = Instant::now();
    let log = RunLog::new();
    let pool = ctx.pool(selected, SUB_FETCHES)?;
    progress.on_pass_start("Collecting", selected);

    let errors: Vec<Vec<FleetError>> = pool.install(|| {
        records
            .par_iter_mut()
            .filter(|r| r.selected)
            .map(|record| {
                let errors = collect(record, ctx, &log);
                progress.on_repo_complete(&record.name, errors.iter().all(FleetError::is_soft));
                errors
            })
            .collect()
    });

    progress.on_pass_complete();
    log::info!(
        "collected {} repositories in {}ms",
        selected,
        start.elapsed().as_millis()
    );

    Ok(CollectReport {
        log: log.into_lines(),
        errors: errors.into_iter().flatten().collect(),
        visited: selected,
    })
}
