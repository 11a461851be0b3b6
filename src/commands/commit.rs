use anyhow::Result;

use crate::Context;
use crate::cli::CommitArgs;
use crate::progress::FleetProgress;
use crate::ui;

pub fn run(ctx: &Context, args: &CommitArgs) -> Result<()> {
    let mut snapshot = super::load(ctx)?;
    let fleet = ctx.settings.context();
    let progress = FleetProgress::new(ctx.quiet);

    let report = fleetkit::commit_fleet(&mut snapshot.repos, &args.message, &fleet, &progress)?;
    if report.outcomes.is_empty() {
        ui::info("Nothing to commit in the selected repositories");
        return Ok(());
    }

    super::print_report(ctx, &report, "Committed");
    super::save(ctx, &mut snapshot)
}
