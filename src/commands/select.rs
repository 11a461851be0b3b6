use anyhow::Result;

use crate::Context;
use crate::cli::SelectArgs;
use crate::ui;
use fleetkit::FleetSnapshot;

pub fn run(ctx: &Context, args: &SelectArgs, selected: bool) -> Result<()> {
    let mut snapshot = super::load(ctx)?;

    if args.all {
        snapshot.select_all(selected);
    } else {
        let names = resolve_names(&snapshot, &args.names);
        for name in snapshot.select(&names, selected) {
            ui::warn(&format!("Unknown repository: {name}"));
        }
    }

    super::save(ctx, &mut snapshot)?;
    ui::success(&format!(
        "{} of {} repositories selected",
        snapshot.selected_count(),
        snapshot.repos.len()
    ));
    Ok(())
}

/// Accept names as displayed, with the target's name prefix stripped
fn resolve_names(snapshot: &FleetSnapshot, names: &[String]) -> Vec<String> {
    let prefix = &snapshot.target.name_prefix;
    names
        .iter()
        .map(|name| {
            let prefixed = format!("{prefix}{name}");
            if snapshot.find(name).is_none() && snapshot.find(&prefixed).is_some() {
                prefixed
            } else {
                name.clone()
            }
        })
        .collect()
}
