//! Task record as reported by the engine's JSON export.
//!
//! Tasks are never built or edited locally; they only arrive through `export`.

use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// One exported engine task.
///
/// Timestamps are kept as the engine's raw strings and parsed on demand, so a
/// malformed value only blanks the column that uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub urgency: f64,
}

impl Task {
    pub fn priority_level(&self) -> Option<Priority> {
        Priority::from_code(&self.priority)
    }
}

/// Parse a JSON array of exported tasks.
pub fn parse_export(bytes: &[u8]) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_engine_export_with_missing_optional_fields() {
        let json = br#"[
            {"id":3,"description":"buy milk","entry":"20240101T120000Z","modified":"20240102T080000Z",
             "priority":"H","project":"home","status":"pending","uuid":"a-b-c","urgency":7.25,
             "tags":["errand"]},
            {"id":4,"description":"read","entry":"20240103T000000Z","status":"pending","uuid":"d-e-f","urgency":0}
        ]"#;
        let tasks = parse_export(json).expect("valid export");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority_level(), Some(Priority::High));
        assert_eq!(tasks[0].urgency, 7.25);
        assert_eq!(tasks[1].due, "");
        assert_eq!(tasks[1].project, "");
        assert_eq!(tasks[1].priority_level(), None);
    }

    #[test]
    fn rejects_non_array_export() {
        assert!(parse_export(b"Created task 3.").is_err());
        assert!(parse_export(b"").is_err());
    }
}
