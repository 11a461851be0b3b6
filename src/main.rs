mod cli;
mod commands;
mod config;
mod paths;
mod progress;
mod snapshot;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Settings;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub settings: Settings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "fleetsync", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        settings: Settings::resolve(&cli)?,
    };

    match cli.command {
        Command::Scan => commands::scan::run(&ctx),
        Command::Status(args) => commands::status::run(&ctx, &args),
        Command::Select(args) => commands::select::run(&ctx, &args, true),
        Command::Deselect(args) => commands::select::run(&ctx, &args, false),
        Command::Target(args) => commands::target::run(&ctx, args),
        Command::Plan(args) => commands::plan::run(&ctx, &args),
        Command::Apply(args) => commands::apply::run(&ctx, &args),
        Command::Commit(args) => commands::commit::run(&ctx, &args),
        Command::Completions { .. } => Ok(()),
    }
}
