//! Keyboard input, independent of the terminal library.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! that handlers and their tests never touch terminal types.

/// A key press as seen by the handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character (shift already applied)
    Char(char),
    /// Ctrl + character (always lowercase)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,

    /// Function key F1-F12
    F(u8),
}

impl InputKey {
    /// Character this key inserts into a text field, if any
    pub fn text_char(&self) -> Option<char> {
        match self {
            InputKey::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Ctrl+C quits from every mode, including text entry
    pub fn is_force_quit(&self) -> bool {
        matches!(self, InputKey::CharCtrl('c'))
    }
}

/// Apply an editing key to a single-line field.
///
/// Returns the new text, or `None` when the key is not an edit.
pub fn edit_line(text: &str, key: &InputKey) -> Option<String> {
    match key {
        InputKey::Char(c) => {
            let mut text = text.to_string();
            text.push(*c);
            Some(text)
        }
        InputKey::Backspace => {
            let mut text = text.to_string();
            text.pop();
            Some(text)
        }
        InputKey::CharCtrl('u') => Some(String::new()),
        InputKey::CharCtrl('w') => {
            let trimmed = text.trim_end();
            let cut = trimmed
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_whitespace())
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            Some(trimmed[..cut].to_string())
        }
        _ => None,
    }
}

/// Apply an editing key to a multi-line field; Enter inserts a newline
pub fn edit_text(text: &str, key: &InputKey) -> Option<String> {
    match key {
        InputKey::Enter => Some(format!("{text}\n")),
        InputKey::Tab => Some(format!("{text}    ")),
        other => edit_line(text, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_line_typing_and_backspace() {
        let text = edit_line("SELEC", &InputKey::Char('T')).unwrap();
        assert_eq!(text, "SELECT");
        assert_eq!(edit_line(&text, &InputKey::Backspace).unwrap(), "SELEC");
        assert_eq!(edit_line("", &InputKey::Backspace).unwrap(), "");
    }

    #[test]
    fn test_edit_line_ctrl_w_deletes_word() {
        assert_eq!(
            edit_line("SELECT name FROM", &InputKey::CharCtrl('w')).unwrap(),
            "SELECT name "
        );
        assert_eq!(edit_line("word", &InputKey::CharCtrl('w')).unwrap(), "");
    }

    #[test]
    fn test_edit_line_ignores_navigation() {
        assert!(edit_line("x", &InputKey::Up).is_none());
        assert!(edit_line("x", &InputKey::Enter).is_none());
    }

    #[test]
    fn test_edit_text_enter_adds_newline() {
        assert_eq!(
            edit_text("SELECT *", &InputKey::Enter).unwrap(),
            "SELECT *\n"
        );
    }

    #[test]
    fn test_force_quit() {
        assert!(InputKey::CharCtrl('c').is_force_quit());
        assert!(!InputKey::Char('c').is_force_quit());
    }
}
