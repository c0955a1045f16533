//! Subcommands and their handlers.

use std::path::Path;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::gateway::TaskCli;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the dashboard (the default).
    Ui,
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
///
/// A failed startup load is the one fatal error: it is printed and the process exits.
pub fn cmd_ui(task_bin: &Path, filter: &str) {
    if let Err(e) = run_tui(TaskCli::new(task_bin), filter) {
        tracing::error!(error = %e, "dashboard aborted");
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print completions for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
