//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Used for high priority rows
pub const PRIORITY_HIGH: Color = Color::Red;
/// Used for medium priority rows
pub const PRIORITY_MEDIUM: Color = Color::Indexed(250);
/// Used for low priority rows
pub const PRIORITY_LOW: Color = Color::Indexed(245);

/// Overlay background for the delete confirmation
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

/// Row color for a priority; unprioritised rows keep the default style.
pub fn priority_color(priority: Option<Priority>) -> Option<Color> {
    priority.map(|p| match p {
        Priority::High => PRIORITY_HIGH,
        Priority::Medium => PRIORITY_MEDIUM,
        Priority::Low => PRIORITY_LOW,
    })
}
