//! Fleetkit - keep a fleet of Maven repository checkouts on one branch and version
//!
//! This crate provides the engine behind `fleetsync`:
//! - Repository discovery under a fleet root
//! - Concurrent state collection (branch, dirty status, descriptor versions)
//! - Planning and reconciliation toward a shared fleet target
//! - Fleet-wide commit of descriptor changes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────────┐
//! │  Inventory   │ ──> │ Collector  │ ──> │   Planner    │
//! │  (discover)  │     │ (refresh)  │     │ (plan/diff)  │
//! └──────────────┘     └────────────┘     └──────────────┘
//!                                                │
//!                                                v
//!                      ┌────────────┐     ┌──────────────┐
//!                      │  Run log   │ <── │   Executor   │
//!                      │ (timings)  │     │ apply/commit │
//!                      └────────────┘     └──────────────┘
//! ```
//!
//! Every pass runs one worker per selected repository on a rayon pool and
//! returns only when all of them are done.
//!
//! # Example
//!
//! ```no_run
//! use fleetkit::{FleetContext, FleetSnapshot, FleetTarget, NoProgress};
//!
//! let ctx = FleetContext::new("/work/services");
//! let mut snapshot = FleetSnapshot::default();
//! snapshot.merge_discovered(&fleetkit::discover(&ctx.root)?);
//! fleetkit::collect_fleet(&mut snapshot.repos, &ctx, &NoProgress)?;
//!
//! let target = FleetTarget {
//!     branch: "release-2.4".into(),
//!     version: "2.4.0".into(),
//!     ..FleetTarget::default()
//! };
//! let report = fleetkit::reconcile_fleet(&mut snapshot.repos, &target, &ctx, &NoProgress)?;
//! for line in &report.log {
//!     println!("{line}");
//! }
//! # Ok::<(), fleetkit::FleetError>(())
//! ```

pub mod collector;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod planner;
pub mod run_log;
pub mod runner;
pub mod types;
pub mod vcs;

pub use collector::{CollectReport, collect, collect_fleet};
pub use context::{FleetContext, NoProgress, ProgressCallback};
pub use error::{FleetError, ProcessError, Result};
pub use executor::{
    CommitReport, DEFAULT_COMMIT_MESSAGE, FleetReport, ReconcileReport, RepoOutcome, apply,
    commit_fleet, preview_fleet, reconcile_fleet,
};
pub use inventory::discover;
pub use planner::{BranchAction, PatchAction, Plan, plan, plan_versions};
pub use run_log::{RunLog, is_timing_line};
pub use runner::{CommandRunner, SystemRunner};
pub use types::{FleetSnapshot, FleetTarget, MergeSummary, RepositoryRecord};
pub use vcs::{GitBackend, Vcs};
