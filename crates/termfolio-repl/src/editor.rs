use termfolio_core::history::PromptInput;
use termfolio_core::Vocabulary;

/// A caret on top of the prompt input state machine.
pub(crate) struct LineEditor {
    pub(crate) input: PromptInput,
    pub(crate) cursor: usize,
}

impl LineEditor {
    pub(crate) fn new() -> Self {
        Self {
            input: PromptInput::new(),
            cursor: 0,
        }
    }

    pub(crate) fn buffer(&self) -> &str {
        self.input.buffer()
    }

    fn edit(&mut self, f: impl FnOnce(&mut String, &mut usize)) {
        let mut buffer = self.input.buffer().to_string();
        let mut cursor = self.cursor.min(buffer.len());
        f(&mut buffer, &mut cursor);
        self.input.set_buffer(buffer);
        self.cursor = cursor;
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        self.edit(|buffer, cursor| {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        });
    }

    /// Pastes arrive as one line; embedded newlines become spaces.
    pub(crate) fn insert_text(&mut self, s: &str) {
        let text: String = s
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.edit(|buffer, cursor| {
            buffer.insert_str(*cursor, &text);
            *cursor += text.len();
        });
    }

    pub(crate) fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_char_boundary();
        self.edit(|buffer, cursor| {
            buffer.drain(prev..*cursor);
            *cursor = prev;
        });
    }

    pub(crate) fn delete_forward(&mut self) {
        if self.cursor >= self.buffer().len() {
            return;
        }
        let next = self.next_char_boundary();
        self.edit(|buffer, cursor| {
            buffer.drain(*cursor..next);
        });
    }

    pub(crate) fn kill_to_end(&mut self) {
        self.edit(|buffer, cursor| buffer.truncate(*cursor));
    }

    pub(crate) fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let bytes = self.buffer().as_bytes();
        let mut pos = self.cursor;
        while pos > 0 && bytes[pos - 1] == b' ' {
            pos -= 1;
        }
        while pos > 0 && bytes[pos - 1] != b' ' {
            pos -= 1;
        }
        self.edit(|buffer, cursor| {
            buffer.drain(pos..*cursor);
            *cursor = pos;
        });
    }

    pub(crate) fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_char_boundary();
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.cursor < self.buffer().len() {
            self.cursor = self.next_char_boundary();
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.buffer().len();
    }

    pub(crate) fn submit(&mut self) -> Option<String> {
        let line = self.input.submit()?;
        self.cursor = 0;
        Some(line)
    }

    /// Drop the draft without recording it.
    pub(crate) fn discard(&mut self) {
        self.input.set_buffer(String::new());
        self.cursor = 0;
    }

    pub(crate) fn history_up(&mut self) {
        self.input.browse_older();
        self.move_end();
    }

    pub(crate) fn history_down(&mut self) {
        self.input.browse_newer();
        self.move_end();
    }

    pub(crate) fn complete(&mut self, vocab: &Vocabulary) -> bool {
        let changed = self.input.complete(vocab);
        if changed {
            self.move_end();
        }
        changed
    }

    fn prev_char_boundary(&self) -> usize {
        let buffer = self.buffer();
        let mut pos = self.cursor - 1;
        while !buffer.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_char_boundary(&self) -> usize {
        let buffer = self.buffer();
        let mut pos = self.cursor + 1;
        while pos < buffer.len() && !buffer.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> LineEditor {
        let mut editor = LineEditor::new();
        for c in text.chars() {
            editor.insert_char(c);
        }
        editor
    }

    #[test]
    fn caret_edits_multibyte_text() {
        let mut editor = typed("héllo");
        editor.move_left();
        editor.move_left();
        editor.move_left();
        editor.move_left();
        editor.delete_back();
        assert_eq!(editor.buffer(), "éllo");
        editor.delete_forward();
        assert_eq!(editor.buffer(), "llo");
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn delete_word_back_stops_at_space() {
        let mut editor = typed("portfolio about");
        editor.delete_word_back();
        assert_eq!(editor.buffer(), "portfolio ");
        editor.delete_word_back();
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn submit_records_history_and_resets_caret() {
        let mut editor = typed("help");
        assert_eq!(editor.submit().as_deref(), Some("help"));
        assert_eq!(editor.cursor, 0);
        editor.history_up();
        assert_eq!(editor.buffer(), "help");
        assert_eq!(editor.cursor, 4);
        editor.history_down();
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.cursor, 0);
    }

    #[test]
    fn tab_completion_moves_caret_to_end() {
        let mut editor = typed("portfolio c");
        assert!(editor.complete(&Vocabulary::default()));
        assert_eq!(editor.buffer(), "portfolio contact");
        assert_eq!(editor.cursor, editor.buffer().len());
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut editor = LineEditor::new();
        editor.insert_text("a\nb");
        assert_eq!(editor.buffer(), "a b");
    }
}
