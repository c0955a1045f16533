//! # tdash - Task Engine Dashboard
//!
//! An interactive terminal dashboard over a Taskwarrior-style task engine. The engine
//! owns every task, its urgency score and its id; the dashboard lists pending work by
//! descending urgency and drives the engine's own commands to change it.
//!
//! ## Keys
//!
//! - `a` - add a task (free text, passed to `task add` as arguments)
//! - `e` - open the engine's editor on the selected task
//! - `d` - mark the selected task done
//! - `x` - delete the selected task, after confirmation
//! - `1` / `2` - focus the task list / the detail pane
//! - `q` - quit
//!
//! ## Quick Start
//!
//! ```bash
//! # Dashboard over pending tasks
//! tdash
//!
//! # Only one project, using a specific engine binary
//! tdash --filter project:home --task-bin /usr/local/bin/task
//!
//! # Diagnostics
//! RUST_LOG=debug tdash --log-file /tmp/tdash.log
//! ```
//!
//! Engine failures never stop the dashboard; their output appears in the
//! Command Log pane. The only fatal error is an unreadable task list at startup.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod command_log;
pub mod error;
pub mod fields;
pub mod format;
pub mod gateway;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod list;
    pub mod rows;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;

/// Send tracing output to `path`. The terminal belongs to the dashboard, so
/// without a log file no subscriber is installed at all.
fn init_tracing(path: &Path) {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_tracing(path);
    }

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&cli.task_bin, &cli.filter),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
