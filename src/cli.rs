use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal dashboard for a Taskwarrior-style task engine.
/// All task data lives in the engine; the dashboard only runs its commands.
#[derive(Parser)]
#[command(name = "tdash", version, about = "Interactive task engine dashboard")]
pub struct Cli {
    /// Engine executable to invoke.
    #[arg(long, global = true, default_value = "task")]
    pub task_bin: PathBuf,

    /// Engine filter selecting the tasks listed at startup.
    #[arg(long, global = true, default_value = "+PENDING")]
    pub filter: String,

    /// Write diagnostic logs to this file (level from RUST_LOG, default info).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_launch_ui_against_task() {
        let cli = Cli::try_parse_from(["tdash"]).expect("parse");
        assert_eq!(cli.task_bin, PathBuf::from("task"));
        assert_eq!(cli.filter, "+PENDING");
        assert!(cli.log_file.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from(["tdash", "ui", "--task-bin", "/opt/tw/task", "--filter", "project:home"])
            .expect("parse");
        assert_eq!(cli.task_bin, PathBuf::from("/opt/tw/task"));
        assert_eq!(cli.filter, "project:home");
        assert!(matches!(cli.command, Some(Commands::Ui)));
    }

    #[test]
    fn completions_takes_a_shell() {
        let cli = Cli::try_parse_from(["tdash", "completions", "bash"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
        assert!(Cli::try_parse_from(["tdash", "completions", "nushell-ish"]).is_err());
    }
}
