//! Synchronous bridge to the external task engine.
//!
//! Every dashboard action ends up here as a flat list of argument tokens. Calls block
//! until the engine exits; there is no retry, timeout or cancellation.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::GatewayError;

/// Something that can run engine commands.
pub trait TaskEngine {
    /// Run the engine with `args` and return its standard output on success.
    fn invoke(&mut self, args: &[String]) -> Result<Vec<u8>, GatewayError>;

    /// Run the engine attached to the caller's terminal (used for the engine's own editor).
    fn invoke_interactive(&mut self, args: &[String]) -> Result<(), GatewayError> {
        self.invoke(args).map(|_| ())
    }
}

/// Engine reached by spawning its command-line binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCli {
    pub binary: PathBuf,
}

impl Default for TaskCli {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("task"),
        }
    }
}

impl TaskCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl TaskEngine for TaskCli {
    fn invoke(&mut self, args: &[String]) -> Result<Vec<u8>, GatewayError> {
        let rendered = render_command(&self.binary, args);
        debug!(command = %rendered, "invoking engine");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| {
                warn!(command = %rendered, error = %source, "engine failed to start");
                GatewayError::Spawn {
                    command: rendered.clone(),
                    source,
                }
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            warn!(command = %rendered, status = ?output.status.code(), "engine call failed");
            return Err(GatewayError::CommandFailed {
                command: rendered,
                status: output.status.code(),
                output: combined,
            });
        }

        Ok(output.stdout)
    }

    fn invoke_interactive(&mut self, args: &[String]) -> Result<(), GatewayError> {
        let rendered = render_command(&self.binary, args);
        debug!(command = %rendered, "invoking engine interactively");

        let status = Command::new(&self.binary)
            .args(args)
            .status()
            .map_err(|source| GatewayError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        if !status.success() {
            warn!(command = %rendered, status = ?status.code(), "interactive engine call failed");
            return Err(GatewayError::CommandFailed {
                command: rendered,
                status: status.code(),
                output: String::new(),
            });
        }
        Ok(())
    }
}

fn render_command(binary: &Path, args: &[String]) -> String {
    let mut rendered = binary.to_string_lossy().into_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}
