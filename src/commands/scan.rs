use anyhow::{Context as _, Result};

use crate::Context;
use crate::commands::status;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let root = &ctx.settings.root;
    let mut snapshot = super::load(ctx)?;

    let names = fleetkit::discover(root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    let merged = snapshot.merge_discovered(&names);

    if !ctx.quiet {
        for name in &merged.added {
            ui::dim(&format!("+ {name}"));
        }
        for name in &merged.removed {
            ui::dim(&format!("- {name} (gone)"));
        }
    }

    status::refresh(ctx, &mut snapshot)?;
    super::save(ctx, &mut snapshot)?;

    ui::success(&format!(
        "Found {} repositories under {} ({} new, {} removed)",
        snapshot.repos.len(),
        root.display(),
        merged.added.len(),
        merged.removed.len()
    ));

    if !ctx.quiet {
        status::print_fleet(&snapshot);
    }
    Ok(())
}
