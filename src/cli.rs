use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "fleetsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Keep a fleet of Maven repositories on one branch and version", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v shows timings, -vv shows every git command)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the repository checkouts [env: FLEETSYNC_ROOT]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<String>,

    /// Maximum concurrent repositories per pass [env: FLEETSYNC_JOBS]
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Descriptor file name inside each repository
    #[arg(long, global = true, value_name = "FILE")]
    pub descriptor: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Discover repositories under the root and collect their state
    Scan,

    /// Show the fleet and its target
    Status(StatusArgs),

    /// Include repositories in fleet passes
    Select(SelectArgs),

    /// Exclude repositories from fleet passes
    Deselect(SelectArgs),

    /// Show or edit the fleet target
    Target(TargetArgs),

    /// Preview what apply would change
    Plan(PlanArgs),

    /// Bring every selected repository to the target
    Apply(ApplyArgs),

    /// Commit the descriptor in every selected repository with changes
    Commit(CommitArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct StatusArgs {
    /// Collect fresh state before printing
    #[arg(short, long)]
    pub refresh: bool,
}

#[derive(Args)]
pub struct SelectArgs {
    /// Repository names
    #[arg(required_unless_present = "all")]
    pub names: Vec<String>,

    /// Every known repository
    #[arg(short, long, conflicts_with = "names")]
    pub all: bool,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Branch every repository should be on
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Project version to declare
    #[arg(long)]
    pub version: Option<String>,

    /// Parent version to declare
    #[arg(long)]
    pub parent_version: Option<String>,

    /// Prefix stripped from repository names when displayed
    #[arg(long)]
    pub prefix: Option<String>,

    /// Reset the target before applying the other flags
    #[arg(long)]
    pub clear: bool,
}

impl TargetArgs {
    /// True when the command only shows the target
    pub fn is_show(&self) -> bool {
        !self.clear
            && self.branch.is_none()
            && self.version.is_none()
            && self.parent_version.is_none()
            && self.prefix.is_none()
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Show the descriptor changes as a diff
    #[arg(short, long)]
    pub diff: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the plan without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short, long, default_value = fleetkit::DEFAULT_COMMIT_MESSAGE)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fleetsync", "scan", "--root", "/srv", "-j", "4", "-vv"])
            .unwrap();
        assert_eq!(cli.root.as_deref(), Some("/srv"));
        assert_eq!(cli.jobs, Some(4));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Scan));
    }

    #[test]
    fn test_select_requires_names_or_all() {
        assert!(Cli::try_parse_from(["fleetsync", "select"]).is_err());
        assert!(Cli::try_parse_from(["fleetsync", "select", "--all", "svc-a"]).is_err());

        let cli = Cli::try_parse_from(["fleetsync", "deselect", "svc-a", "svc-b"]).unwrap();
        match cli.command {
            Command::Deselect(args) => assert_eq!(args.names, ["svc-a", "svc-b"]),
            _ => panic!("expected deselect"),
        }
    }

    #[test]
    fn test_commit_default_message() {
        let cli = Cli::try_parse_from(["fleetsync", "commit"]).unwrap();
        match cli.command {
            Command::Commit(args) => assert_eq!(args.message, "update pom version"),
            _ => panic!("expected commit"),
        }
    }

    #[test]
    fn test_target_show_vs_edit() {
        let cli = Cli::try_parse_from(["fleetsync", "target"]).unwrap();
        let Command::Target(args) = cli.command else {
            panic!("expected target");
        };
        assert!(args.is_show());

        let cli = Cli::try_parse_from(["fleetsync", "target", "--parent-version", "3.2.0"]).unwrap();
        let Command::Target(args) = cli.command else {
            panic!("expected target");
        };
        assert!(!args.is_show());
        assert_eq!(args.parent_version.as_deref(), Some("3.2.0"));
    }
}
