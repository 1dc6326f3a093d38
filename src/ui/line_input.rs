use crossterm::event::{KeyCode, KeyEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Minimal single-line text input used for topic entry.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled
    /// rendering. When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap();
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => InputResult::Submit,
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Char(ch) => {
                let byte = self.char_to_byte(self.cursor);
                self.text.insert(byte, ch);
                self.cursor += 1;
                InputResult::Continue
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte = self.char_to_byte(self.cursor);
                    self.text.remove(byte);
                }
                InputResult::Continue
            }
            KeyCode::Delete => {
                if self.cursor < self.text.chars().count() {
                    let byte = self.char_to_byte(self.cursor);
                    self.text.remove(byte);
                }
                InputResult::Continue
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
                InputResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.text.chars().count();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(input: &mut LineInput, code: KeyCode) -> InputResult {
        input.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = LineInput::new("");
        press(&mut input, KeyCode::Char('r'));
        press(&mut input, KeyCode::Char('s'));
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Char('u'));
        assert_eq!(input.value(), "rus");
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut input = LineInput::new("拼音");
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "拼");
    }

    #[test]
    fn enter_submits_and_esc_cancels() {
        let mut input = LineInput::new("x");
        assert_eq!(press(&mut input, KeyCode::Enter), InputResult::Submit);
        assert_eq!(press(&mut input, KeyCode::Esc), InputResult::Cancel);
    }

    #[test]
    fn render_parts_splits_around_cursor() {
        let mut input = LineInput::new("abc");
        press(&mut input, KeyCode::Left);
        let (before, at, after) = input.render_parts();
        assert_eq!((before, at, after), ("ab", Some('c'), ""));
    }
}
