//! Input field handling for the terminal user interface.

/// Longest new-task line the entry overlay accepts.
pub const MAX_INPUT_LEN: usize = 100;

/// A single-line text input with a character cursor and a length limit.
#[derive(Clone, Debug)]
pub struct InputField {
    pub value: String,
    /// Cursor position in characters.
    pub cursor: usize,
    pub max_len: usize,
}

impl InputField {
    /// Create a new empty input field accepting at most `max_len` characters.
    pub fn new(max_len: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            max_len,
        }
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the cursor unless the field is full.
    pub fn handle_char(&mut self, c: char) {
        if self.len() >= self.max_len {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.len();
    }

    /// Take the text out, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}
