//! Table rows derived from engine tasks.
//!
//! A `TaskRow` is display-only: seven rendered strings plus the priority color and
//! the two values the controller needs back (the id and the description).

use chrono::{DateTime, Utc};
use ratatui::style::Color;

use crate::format::{format_duration, parse_timestamp};
use crate::task::Task;
use crate::tui::colors::priority_color;

pub const NUMBER_OF_COLUMNS: usize = 7;

pub const TASK_HEADERS: [&str; NUMBER_OF_COLUMNS] =
    ["ID", "Age", "P", "Project", "Due", "Description", "Urg"];

/// Column indices.
pub const COL_ID: usize = 0;
pub const COL_AGE: usize = 1;
pub const COL_PRIORITY: usize = 2;
pub const COL_PROJECT: usize = 3;
pub const COL_DUE: usize = 4;
pub const COL_DESCRIPTION: usize = 5;
pub const COL_URGENCY: usize = 6;

/// One rendered task. A `None` cell was omitted because its source did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: u64,
    pub cells: [Option<String>; NUMBER_OF_COLUMNS],
    pub color: Option<Color>,
}

impl TaskRow {
    /// Render `task` relative to `now`.
    pub fn render(task: &Task, now: DateTime<Utc>) -> Self {
        let mut cells: [Option<String>; NUMBER_OF_COLUMNS] = Default::default();

        cells[COL_ID] = Some(task.id.to_string());
        cells[COL_AGE] = parse_timestamp(&task.entry).map(|entry| format_duration(now - entry));
        cells[COL_PRIORITY] = Some(task.priority.clone());
        cells[COL_PROJECT] = Some(task.project.clone());
        cells[COL_DUE] = if task.due.is_empty() {
            Some(String::new())
        } else {
            parse_timestamp(&task.due).map(|due| {
                if due > now {
                    format_duration(due - now)
                } else {
                    format!("-{}", format_duration(now - due))
                }
            })
        };
        cells[COL_DESCRIPTION] = Some(task.description.clone());
        cells[COL_URGENCY] = Some(format!("{:.2}", task.urgency));

        TaskRow {
            id: task.id,
            cells,
            color: priority_color(task.priority_level()),
        }
    }

    /// Cell text, blank when omitted.
    pub fn text(&self, col: usize) -> &str {
        self.cells[col].as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.text(COL_DESCRIPTION)
    }
}

/// Separator row with project and description dashes sized to the longest values in `tasks`.
pub fn separator_row(tasks: &[Task]) -> [String; NUMBER_OF_COLUMNS] {
    let project_width = tasks
        .iter()
        .map(|t| t.project.chars().count())
        .max()
        .unwrap_or(0);
    let description_width = tasks
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(0);

    [
        "--".to_string(),
        "---".to_string(),
        "--".to_string(),
        "-".repeat(project_width),
        "---".to_string(),
        "-".repeat(description_width),
        "-".repeat(5),
    ]
}
