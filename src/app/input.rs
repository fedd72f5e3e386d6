//! Single-line text input with a character cursor.

use unicode_width::UnicodeWidthStr;

/// Editable line of text. The cursor is a char index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display column of the cursor, accounting for wide characters.
    pub fn cursor_column(&self) -> usize {
        self.text[..self.byte_index()].width()
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Insert pasted text. Line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\r' => {}
                '\n' | '\t' => self.insert_char(' '),
                c => self.insert_char(c),
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index();
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the text and leave the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_edit_in_middle() {
        let mut input = InputBuffer::new();
        input.insert_str("helo");
        input.move_left();
        input.insert_char('l');
        assert_eq!(input.as_str(), "hello");
        assert_eq!(input.cursor(), 4);

        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), "ello");
        input.move_end();
        input.backspace();
        assert_eq!(input.as_str(), "ell");
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut input = InputBuffer::new();
        input.insert_str("日本");
        assert_eq!(input.cursor(), 2);
        assert_eq!(input.cursor_column(), 4);
        input.backspace();
        assert_eq!(input.as_str(), "日");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBuffer::new();
        input.insert_str("a.pdf\r\nb.md");
        assert_eq!(input.as_str(), "a.pdf b.md");
    }

    #[test]
    fn test_take_resets() {
        let mut input = InputBuffer::new();
        input.insert_str("question");
        assert_eq!(input.take(), "question");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
        input.backspace();
        input.move_left();
        assert_eq!(input.cursor(), 0);
    }
}
