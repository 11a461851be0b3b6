use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::StatusArgs;
use crate::progress::FleetProgress;
use crate::ui;
use fleetkit::{FleetSnapshot, FleetTarget, RepositoryRecord};

pub fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let mut snapshot = super::load(ctx)?;

    if args.refresh {
        refresh(ctx, &mut snapshot)?;
        super::save(ctx, &mut snapshot)?;
    }

    print_fleet(&snapshot);
    Ok(())
}

/// Collect fresh state for every selected repository
pub fn refresh(ctx: &Context, snapshot: &mut FleetSnapshot) -> Result<()> {
    let fleet = ctx.settings.context();
    let progress = FleetProgress::new(ctx.quiet);
    let report = fleetkit::collect_fleet(&mut snapshot.repos, &fleet, &progress)?;
    snapshot.sort_by_name();
    ui::run_log(&report.log, ctx.verbose > 0);
    Ok(())
}

/// Print the fleet table and the target
pub fn print_fleet(snapshot: &FleetSnapshot) {
    if snapshot.repos.is_empty() {
        ui::info("No repositories known. Run: fleetsync scan");
        return;
    }

    let prefix = snapshot.target.name_prefix.as_str();
    ui::header(&format!(
        "Fleet ({} of {} selected)",
        snapshot.selected_count(),
        snapshot.repos.len()
    ));

    let name_width = column_width(&snapshot.repos, |r| r.display_name(prefix));
    let branch_width = column_width(&snapshot.repos, |r| ui::or_unknown(&r.branch));
    let version_width = column_width(&snapshot.repos, |r| ui::or_unknown(&r.version));

    for record in &snapshot.repos {
        println!(
            "{}",
            format_row(record, &snapshot.target, name_width, branch_width, version_width)
        );
    }

    println!();
    print_target(&snapshot.target);
    ui::kv(
        "Updated",
        &snapshot
            .last_updated
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
}

fn column_width<'a>(
    records: &'a [RepositoryRecord],
    value: impl Fn(&'a RepositoryRecord) -> &'a str,
) -> usize {
    records
        .iter()
        .map(|r| value(r).chars().count())
        .max()
        .unwrap_or(0)
}

fn format_row(
    record: &RepositoryRecord,
    target: &FleetTarget,
    name_width: usize,
    branch_width: usize,
    version_width: usize,
) -> String {
    let check = if record.selected {
        "[x]".green()
    } else {
        "[ ]".dimmed()
    };
    let dirty = if record.dirty { "*".yellow() } else { " ".normal() };
    let name = ui::pad(record.display_name(&target.name_prefix), name_width);
    let name = if record.selected {
        name.bold()
    } else {
        name.dimmed()
    };

    let branch = highlight(
        &ui::pad(ui::or_unknown(&record.branch), branch_width),
        &target.branch,
        &record.branch,
    );
    let version = highlight(
        &ui::pad(ui::or_unknown(&record.version), version_width),
        &target.version,
        &record.version,
    );
    let parent = highlight(
        ui::or_unknown(&record.parent_version),
        &target.parent_version,
        &record.parent_version,
    );

    format!("  {check} {name}{dirty} {branch}  {version}  {parent}")
}

/// Yellow when a target is set and the value does not meet it
fn highlight(text: &str, wanted: &str, actual: &str) -> colored::ColoredString {
    if !wanted.is_empty() && wanted != actual {
        text.yellow()
    } else {
        text.normal()
    }
}

pub fn print_target(target: &FleetTarget) {
    println!("{}", "Target".cyan().bold());
    if target.is_empty() && target.name_prefix.is_empty() {
        ui::dim("(not set) Run: fleetsync target --branch <BRANCH> --version <VERSION>");
        return;
    }
    ui::kv("Branch", ui::or_unknown(&target.branch));
    ui::kv("Version", ui::or_unknown(&target.version));
    ui::kv("Parent version", ui::or_unknown(&target.parent_version));
    if !target.name_prefix.is_empty() {
        ui::kv("Name prefix", &target.name_prefix);
    }
}
