use anyhow::Result;

use crate::Context;
use crate::cli::TargetArgs;
use crate::commands::status;
use crate::ui;
use fleetkit::FleetTarget;

pub fn run(ctx: &Context, args: TargetArgs) -> Result<()> {
    let mut snapshot = super::load(ctx)?;

    if !args.is_show() {
        edit(&mut snapshot.target, args);
        super::save(ctx, &mut snapshot)?;
        ui::success("Target updated");
    }

    status::print_target(&snapshot.target);
    Ok(())
}

fn edit(target: &mut FleetTarget, args: TargetArgs) {
    if args.clear {
        *target = FleetTarget::default();
    }
    if let Some(branch) = args.branch {
        target.branch = branch.trim().to_string();
    }
    if let Some(version) = args.version {
        target.version = version.trim().to_string();
    }
    if let Some(parent_version) = args.parent_version {
        target.parent_version = parent_version.trim().to_string();
    }
    if let Some(prefix) = args.prefix {
        target.name_prefix = prefix;
    }
}
