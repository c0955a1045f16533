//! Task list controller.
//!
//! Owns the visible rows and keeps them in step with the engine. The list is built from
//! a full export once at startup; afterwards rows are only appended (create) or removed
//! (complete, delete). Tasks are never edited locally.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::command_log::CommandLog;
use crate::error::DashError;
use crate::format::{parse_created_id, split_fields};
use crate::gateway::TaskEngine;
use crate::task::parse_export;
use crate::tui::rows::{separator_row, TaskRow, NUMBER_OF_COLUMNS};

/// Run an engine command, sending any failure to the command log instead of the caller.
pub fn run_command(
    engine: &mut dyn TaskEngine,
    log: &mut CommandLog,
    args: &[String],
) -> Option<Vec<u8>> {
    match engine.invoke(args) {
        Ok(out) => Some(out),
        Err(e) => {
            log.append(&e.log_text());
            None
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Ordered visible rows plus the current selection.
#[derive(Debug, Clone)]
pub struct TaskList {
    rows: Vec<TaskRow>,
    separator: [String; NUMBER_OF_COLUMNS],
    selected: Option<usize>,
}

impl TaskList {
    /// Export every task matching `filter` and build the list, highest urgency first.
    ///
    /// This is the one place where a failure aborts the dashboard.
    pub fn load(
        engine: &mut dyn TaskEngine,
        log: &mut CommandLog,
        filter: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DashError> {
        let args = owned(&[filter, "export"]);
        let out = engine.invoke(&args).map_err(|e| {
            log.append(&e.log_text());
            DashError::Load {
                command: args.join(" "),
                message: e.log_text(),
            }
        })?;

        let mut tasks = parse_export(&out)?;
        // Stable: equal urgencies keep export order.
        tasks.sort_by(|a, b| b.urgency.partial_cmp(&a.urgency).unwrap_or(Ordering::Equal));

        let separator = separator_row(&tasks);
        let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::render(t, now)).collect();
        info!(count = rows.len(), filter, "loaded tasks");

        Ok(TaskList {
            selected: if rows.is_empty() { None } else { Some(0) },
            rows,
            separator,
        })
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn separator(&self) -> &[String; NUMBER_OF_COLUMNS] {
        &self.separator
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&TaskRow> {
        self.selected.and_then(|idx| self.rows.get(idx))
    }

    /// Move the selection down, wrapping to the first row.
    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) if idx + 1 < self.rows.len() => idx + 1,
            _ => 0,
        });
    }

    /// Move the selection up, wrapping to the last row.
    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) if idx > 0 => idx - 1,
            _ => self.rows.len() - 1,
        });
    }

    /// Remove the row for `id`, keeping the selection on a neighbouring row.
    fn remove_id(&mut self, id: u64) -> bool {
        let Some(idx) = self.rows.iter().position(|r| r.id == id) else {
            return false;
        };
        self.rows.remove(idx);
        self.selected = match self.selected {
            _ if self.rows.is_empty() => None,
            Some(sel) if sel > idx || sel >= self.rows.len() => Some(sel.saturating_sub(1)),
            other => other,
        };
        true
    }

    /// Add a task from free text and append its row.
    ///
    /// Returns the new id, or `None` when the engine call failed or its confirmation
    /// could not be read (the failure is in the log).
    pub fn create(
        &mut self,
        engine: &mut dyn TaskEngine,
        log: &mut CommandLog,
        text: &str,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        let mut args = vec!["add".to_string()];
        args.extend(split_fields(text));

        let out = run_command(engine, log, &args)?;
        let out = String::from_utf8_lossy(&out);
        let first_line = out.lines().next().unwrap_or("");
        let Some(id) = parse_created_id(first_line) else {
            log.append(&format!("unrecognised add output: {first_line}"));
            return None;
        };

        let export = run_command(engine, log, &[id.to_string(), "export".to_string()])?;
        let task = match parse_export(&export) {
            Ok(tasks) => tasks.into_iter().next(),
            Err(e) => {
                log.append(&format!("malformed export for task {id}: {e}"));
                return None;
            }
        };
        let Some(task) = task else {
            log.append(&format!("task {id} missing from export"));
            return None;
        };

        self.rows.push(TaskRow::render(&task, now));
        if self.selected.is_none() {
            self.selected = Some(self.rows.len() - 1);
        }
        info!(id, "created task");
        Some(id)
    }

    /// Open the engine's own editor on the selected task. Rows are not re-rendered.
    pub fn edit_selected(&self, engine: &mut dyn TaskEngine, log: &mut CommandLog) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if let Err(e) = engine.invoke_interactive(&[row.id.to_string(), "edit".to_string()]) {
            log.append(&e.log_text());
        }
    }

    /// Mark the selected task done and drop its row whether or not the engine agreed.
    pub fn complete_selected(&mut self, engine: &mut dyn TaskEngine, log: &mut CommandLog) {
        let Some(id) = self.selected_row().map(|r| r.id) else {
            return;
        };
        if let Some(out) = run_command(engine, log, &[id.to_string(), "done".to_string()]) {
            log.append(&String::from_utf8_lossy(&out));
        }
        self.remove_id(id);
        info!(id, "completed task");
    }

    /// Drop the row for `id` and delete it in the engine without the engine's own prompt.
    pub fn delete(&mut self, engine: &mut dyn TaskEngine, log: &mut CommandLog, id: u64) {
        self.remove_id(id);
        let args = vec![
            "rc.confirmation=off".to_string(),
            id.to_string(),
            "delete".to_string(),
        ];
        let _ = run_command(engine, log, &args);
        info!(id, "deleted task");
    }

    /// Raw engine detail text for the selected task, or empty when nothing is selected.
    pub fn detail(&self, engine: &mut dyn TaskEngine, log: &mut CommandLog) -> String {
        let Some(row) = self.selected_row() else {
            return String::new();
        };
        run_command(engine, log, &[row.id.to_string()])
            .map(|out| String::from_utf8_lossy(&out).into_owned())
            .unwrap_or_default()
    }
}
