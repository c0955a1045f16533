//! Append-only log surface shown in the dashboard's "Command Log" pane.

/// Lines of engine output the operator should see, oldest first.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    lines: Vec<String>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of text; each of its lines becomes one log line.
    pub fn append(&mut self, text: &str) {
        let text = text.trim_end_matches('\n');
        if text.is_empty() {
            return;
        }
        self.lines.extend(text.lines().map(str::to_string));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The last `n` lines, for a pane that only has room for that many.
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
