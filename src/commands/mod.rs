pub mod apply;
pub mod commit;
pub mod plan;
pub mod scan;
pub mod select;
pub mod status;
pub mod target;

use crate::Context;
use crate::snapshot;
use anyhow::Result;
use fleetkit::FleetSnapshot;

/// Load the snapshot for the resolved fleet
pub(crate) fn load(ctx: &Context) -> Result<FleetSnapshot> {
    snapshot::load(&ctx.settings.snapshot_path())
}

/// Save the snapshot for the resolved fleet
pub(crate) fn save(ctx: &Context, snapshot: &mut FleetSnapshot) -> Result<()> {
    snapshot::save(&ctx.settings.snapshot_path(), snapshot)
}

/// Print the per-repository failures of a pass and a one-line summary
pub(crate) fn print_report(ctx: &Context, report: &fleetkit::FleetReport, action: &str) {
    crate::ui::run_log(&report.log, ctx.verbose > 0);

    let total = report.outcomes.len();
    let failed = report.failed().count();
    println!();
    if failed == 0 {
        crate::ui::success(&format!("{action} {total} repositories"));
    } else {
        crate::ui::warn(&format!(
            "{action} {total} repositories, {failed} with errors"
        ));
    }
}
