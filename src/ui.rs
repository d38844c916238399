//! Terminal front-end: raw mode lifecycle and the frame renderer.
//!
//! The UI is a collaborator of the engine, not part of it: it reads
//! the buffer store and the input line and paints. It never mutates
//! session state beyond reporting the viewport geometry back to the
//! store for scroll arithmetic.

mod render;
pub mod text;

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use crate::buffers::BufferStore;
use crate::session::RegistrationState;

/// Restores the terminal on drop, whatever the exit path.
pub struct RawModeGuard;

impl RawModeGuard {
    /// Enter raw mode and hide the cursor.
    pub fn activate() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        queue!(stdout, Hide)?;
        stdout.flush()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, MoveTo(0, 0), Clear(ClearType::All), Show);
    }
}

/// The terminal renderer.
pub struct Ui {
    out: Stdout,
    width: u16,
    height: u16,
}

impl Ui {
    /// Query the terminal size and build the renderer.
    pub fn new() -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self {
            out: io::stdout(),
            width,
            height,
        })
    }

    /// Record a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Content-area geometry: text width and scrollback rows. The
    /// bottom two rows are the status bar and the input line.
    pub fn content_size(&self) -> (usize, usize) {
        (
            self.width as usize,
            self.height.saturating_sub(2) as usize,
        )
    }

    /// Status-bar connection fragment for the current session state.
    pub fn connection_text(state: RegistrationState, channel: &str) -> String {
        match state {
            RegistrationState::Registered => format!("[Connected to {}]", channel),
            RegistrationState::Connecting | RegistrationState::Registering => {
                "[Connecting]".to_string()
            }
            RegistrationState::Disconnected => "[Disconnected]".to_string(),
        }
    }

    /// Repaint the whole frame.
    pub fn draw(
        &mut self,
        store: &BufferStore,
        state: RegistrationState,
        channel: &str,
        input: &str,
    ) -> io::Result<()> {
        let connection = Self::connection_text(state, channel);
        render::draw_frame(
            &mut self.out,
            store,
            &connection,
            input,
            self.width,
            self.height,
        )
    }
}
