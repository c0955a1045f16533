//! Error types for engine invocation and dashboard startup.

/// Failure of a single engine invocation.
///
/// Callers are expected to log these and carry on; none of them is fatal on its own.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("engine failed to start ({command}): {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine returned non-zero exit ({command}) status={status:?}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        output: String,
    },
}

impl GatewayError {
    /// Text written to the command log pane for this failure.
    pub fn log_text(&self) -> String {
        match self {
            GatewayError::Spawn { .. } => self.to_string(),
            GatewayError::CommandFailed { output, .. } if !output.trim().is_empty() => {
                output.trim_end().to_string()
            }
            GatewayError::CommandFailed { .. } => self.to_string(),
        }
    }
}

/// Errors that abort the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("terminal io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("could not load tasks ({command}): {message}")]
    Load { command: String, message: String },
    #[error("malformed task export: {0}")]
    Export(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::{DashError, GatewayError};
    use std::error::Error;

    #[test]
    fn spawn_variant_includes_command_and_has_source() {
        let err = GatewayError::Spawn {
            command: "task export".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("engine failed to start (task export)"));
        assert!(rendered.contains("no such file"));
        assert!(err.source().is_some());
        assert_eq!(err.log_text(), rendered);
    }

    #[test]
    fn command_failed_logs_engine_output_when_present() {
        let err = GatewayError::CommandFailed {
            command: "task 7 done".to_string(),
            status: Some(1),
            output: "No tasks specified.\n".to_string(),
        };
        assert!(err.to_string().contains("status=Some(1)"));
        assert_eq!(err.log_text(), "No tasks specified.");

        let silent = GatewayError::CommandFailed {
            command: "task 7 done".to_string(),
            status: Some(2),
            output: "  \n".to_string(),
        };
        assert!(silent.log_text().contains("task 7 done"));
    }

    #[test]
    fn export_error_converts_from_serde() {
        let source = serde_json::from_str::<Vec<u8>>("not json").expect_err("invalid json");
        let err: DashError = source.into();
        assert!(err.to_string().starts_with("malformed task export"));
    }
}
