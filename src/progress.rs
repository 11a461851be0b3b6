//! Progress indicators for fleetsync passes.

use colored::Colorize;
use fleetkit::ProgressCallback;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar fed by pass workers
pub struct FleetProgress {
    bar: ProgressBar,
    enabled: bool,
}

impl FleetProgress {
    /// A bar that stays hidden when `quiet` is set
    pub fn new(quiet: bool) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Self {
            bar,
            enabled: !quiet,
        }
    }
}

impl ProgressCallback for FleetProgress {
    fn on_pass_start(&self, label: &str, count: usize) {
        self.bar.reset();
        self.bar.set_length(count as u64);
        self.bar.set_prefix(label.to_string());
        if self.enabled {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
        }
    }

    fn on_repo_complete(&self, name: &str, ok: bool) {
        self.bar.set_message(name.to_string());
        if !ok && self.enabled {
            self.bar
                .suspend(|| eprintln!("  {} {}", "✗".red(), name));
        }
        self.bar.inc(1);
    }

    fn on_pass_complete(&self) {
        self.bar.finish_and_clear();
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }
}
