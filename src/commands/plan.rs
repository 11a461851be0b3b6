use anyhow::Result;
use colored::Colorize;
use std::fs;

use crate::Context;
use crate::cli::PlanArgs;
use crate::ui;
use fleetkit::descriptor::{self, PatchError};
use fleetkit::{FleetContext, FleetSnapshot, PatchAction, RepoOutcome, RepositoryRecord};

pub fn run(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let snapshot = super::load(ctx)?;
    if snapshot.target.is_empty() {
        ui::info("No target set. Run: fleetsync target --branch <BRANCH> --version <VERSION>");
        return Ok(());
    }

    let fleet = ctx.settings.context();
    let outcomes = fleetkit::preview_fleet(&snapshot.repos, &snapshot.target, &fleet)?;
    print_plan(&snapshot, &outcomes, &fleet, args.diff);
    Ok(())
}

/// Count of repositories that would change or could not be planned
pub fn pending(outcomes: &[RepoOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|o| !o.is_success() || o.plan.is_none_or(|p| !p.is_noop()))
        .count()
}

pub fn print_plan(
    snapshot: &FleetSnapshot,
    outcomes: &[RepoOutcome],
    fleet: &FleetContext,
    show_diff: bool,
) {
    let prefix = snapshot.target.name_prefix.as_str();
    ui::header(&format!("Plan ({} of {} to change)", pending(outcomes), outcomes.len()));

    for outcome in outcomes {
        let Some(record) = snapshot.find(&outcome.name) else {
            continue;
        };
        let name = record.display_name(prefix);

        match outcome.plan {
            Some(plan) if plan.is_noop() && outcome.is_success() => {
                println!("  {} {} {}", "✓".green(), name, "up to date".dimmed());
            }
            Some(plan) if !plan.is_noop() => {
                println!("  {} {} {}", "~".yellow(), name.bold(), plan);
                if show_diff {
                    show_descriptor_diff(record, &snapshot.target, fleet, &plan);
                }
            }
            _ => {}
        }
        for err in &outcome.errors {
            println!("  {} {} {}", "✗".red(), name.bold(), err);
        }
    }
}

/// Descriptor text after the planned patches, without touching the file
fn patched_descriptor(
    content: &str,
    record: &RepositoryRecord,
    target: &fleetkit::FleetTarget,
    plan: &fleetkit::Plan,
) -> Result<String, PatchError> {
    let mut patched = content.to_string();
    if plan.version == PatchAction::Patch {
        patched = descriptor::patch_content(
            &patched,
            record.version_line,
            &record.version,
            &target.version,
        )?;
    }
    if plan.parent_version == PatchAction::Patch {
        patched = descriptor::patch_content(
            &patched,
            record.parent_version_line,
            &record.parent_version,
            &target.parent_version,
        )?;
    }
    Ok(patched)
}

fn show_descriptor_diff(
    record: &RepositoryRecord,
    target: &fleetkit::FleetTarget,
    fleet: &FleetContext,
    plan: &fleetkit::Plan,
) {
    if plan.version == PatchAction::None && plan.parent_version == PatchAction::None {
        return;
    }

    let path = fleet.descriptor_path(&record.name);
    let Ok(current) = fs::read_to_string(&path) else {
        println!("    {}", format!("cannot read {}", path.display()).red());
        return;
    };

    let patched = match patched_descriptor(&current, record, target, plan) {
        Ok(patched) => patched,
        Err(PatchError::Stale { found }) => {
            println!(
                "    {}",
                format!("descriptor changed since last scan (found {found:?}); run fleetsync scan")
                    .yellow()
            );
            return;
        }
        Err(PatchError::Io(e)) => {
            println!("    {}", e.to_string().red());
            return;
        }
    };

    let diff = similar::TextDiff::from_lines(&current, &patched);
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                print!("    {}", format!("{:>4} - {change}", line_no(change.old_index())).red());
            }
            similar::ChangeTag::Insert => {
                print!("    {}", format!("{:>4} + {change}", line_no(change.new_index())).green());
            }
            similar::ChangeTag::Equal => {}
        }
    }
}

fn line_no(index: Option<usize>) -> String {
    index.map(|i| (i + 1).to_string()).unwrap_or_default()
}
