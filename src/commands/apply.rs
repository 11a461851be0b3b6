use anyhow::Result;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::commands::plan;
use crate::progress::FleetProgress;
use crate::ui;

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let mut snapshot = super::load(ctx)?;
    if snapshot.target.is_empty() {
        ui::info("No target set. Run: fleetsync target --branch <BRANCH> --version <VERSION>");
        return Ok(());
    }
    if snapshot.selected_count() == 0 {
        ui::info("No repositories selected");
        return Ok(());
    }

    let fleet = ctx.settings.context();
    let preview = fleetkit::preview_fleet(&snapshot.repos, &snapshot.target, &fleet)?;
    plan::print_plan(&snapshot, &preview, &fleet, false);

    if plan::pending(&preview) == 0 {
        println!();
        ui::success("Fleet already matches the target");
        return Ok(());
    }

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(());
    }

    if !args.yes && !confirm_proceed()? {
        ui::info("Aborted");
        return Ok(());
    }

    let progress = FleetProgress::new(ctx.quiet);
    let report =
        fleetkit::reconcile_fleet(&mut snapshot.repos, &snapshot.target, &fleet, &progress)?;

    super::print_report(ctx, &report, "Reconciled");
    super::save(ctx, &mut snapshot)?;

    let dirty = snapshot.repos.iter().filter(|r| r.selected && r.dirty).count();
    if dirty > 0 {
        ui::dim(&format!(
            "{dirty} repositories have uncommitted changes. Run: fleetsync commit"
        ));
    }
    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Apply these changes?")
        .default(false)
        .interact()?;

    Ok(confirmed)
}
