//! Field types reported by the task engine.

/// Engine priority levels. A task without a priority has no value at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse the engine's single-letter priority code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" => Some(Priority::High),
            "M" => Some(Priority::Medium),
            "L" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Priority::High => "H",
            Priority::Medium => "M",
            Priority::Low => "L",
        }
    }
}
