//! The input dispatcher: terminal key events to editor/navigation actions.
//!
//! Owns the single-line input buffer and translates each keystroke
//! into at most one [`InputEvent`] for the event loop. Scrolling and
//! buffer switching never touch the input buffer; submission empties
//! it atomically.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Byte capacity of the input line.
pub const INPUT_CAPACITY: usize = 400;

/// An action produced by one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter on a non-empty line: dispatch this text.
    Submit(String),
    /// Scroll the active buffer by displayed rows; positive is up
    /// (towards older lines). `full_page` selects the page size.
    Scroll {
        /// Direction and unit count: +1 up, -1 down.
        direction: i8,
        /// Shift-modified page keys scroll a full page.
        full_page: bool,
    },
    /// Alt-j: activate the next buffer in the cycle.
    NextBuffer,
    /// Alt-k: activate the previous buffer in the cycle.
    PrevBuffer,
    /// Ctrl-C: shut down without sending QUIT.
    Interrupt,
}

/// The input line state.
#[derive(Debug, Default)]
pub struct InputLine {
    buffer: String,
}

impl InputLine {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, for the renderer.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Apply one key event; returns the resulting action, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.buffer.is_empty() {
                    return None;
                }
                Some(InputEvent::Submit(std::mem::take(&mut self.buffer)))
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::PageUp => Some(InputEvent::Scroll {
                direction: 1,
                full_page: key.modifiers.contains(KeyModifiers::SHIFT),
            }),
            KeyCode::PageDown => Some(InputEvent::Scroll {
                direction: -1,
                full_page: key.modifiers.contains(KeyModifiers::SHIFT),
            }),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Interrupt)
            }
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(InputEvent::NextBuffer)
            }
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(InputEvent::PrevBuffer)
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) || ch.is_control() {
                    return None;
                }
                if self.buffer.len() + ch.len_utf8() <= INPUT_CAPACITY {
                    self.buffer.push(ch);
                }
                None
            }
            _ => None,
        }
    }
}
