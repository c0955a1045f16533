//! Enumerations for TUI state management.

/// Interaction mode. Exactly one is active, and at most one overlay is visible.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    /// Table navigation and single-key shortcuts.
    Normal,
    /// New-task text entry overlay.
    CreateEntry,
    /// Cancel/Delete overlay for the task captured when `x` was pressed.
    ConfirmDelete {
        id: u64,
        description: String,
        choice: ConfirmChoice,
    },
}

/// Button highlighted in the delete confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmChoice {
    Cancel,
    Delete,
}

impl ConfirmChoice {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Cancel => ConfirmChoice::Delete,
            ConfirmChoice::Delete => ConfirmChoice::Cancel,
        }
    }
}

/// Pane receiving navigation keys in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Tasks,
    Detail,
}

/// What the event loop must do after a key has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Hand the terminal to the engine's editor for the selected task.
    Edit,
}
