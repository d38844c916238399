//! Frame painting: scrollback area, status bar, input line.
//!
//! The renderer is pull-oriented: it reads the buffer store and the
//! input line after each event and repaints the whole frame with
//! queued crossterm commands, flushing once.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};

use crate::buffers::BufferStore;

use super::text::{pad_or_trim, wrap_columns};

/// Compute the visible rows of the active buffer.
///
/// Every stored line wraps into display rows; the viewport shows
/// `height` rows ending `scroll_offset` rows above the bottom.
pub(super) fn visible_rows(store: &BufferStore, width: usize, height: usize) -> Vec<String> {
    let buf = store.get(store.active());
    let mut rows: Vec<String> = Vec::new();
    for line in buf.lines() {
        rows.extend(wrap_columns(line, width));
    }
    let end = rows.len().saturating_sub(buf.scroll_offset());
    let start = end.saturating_sub(height);
    rows[start..end].to_vec()
}

/// Status bar text: connection state plus the buffer cycle with
/// unread counts, the active buffer bracketed.
pub(super) fn status_bar_text(store: &BufferStore, connection: &str) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(store.len() + 1);
    parts.push(connection.to_string());
    for (pos, buf) in store.iter().enumerate() {
        let tab = if pos == store.active() {
            format!("[{}]", buf.name())
        } else if buf.unread() > 0 {
            format!("{}(+{})", buf.name(), buf.unread())
        } else {
            buf.name().to_string()
        };
        parts.push(tab);
    }
    parts.join(" ")
}

/// Paint one frame.
pub(super) fn draw_frame(
    out: &mut impl Write,
    store: &BufferStore,
    connection: &str,
    input: &str,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let width = width as usize;
    let content_height = height.saturating_sub(2) as usize;

    queue!(out, Clear(ClearType::All))?;

    let rows = visible_rows(store, width, content_height);
    let top_pad = content_height.saturating_sub(rows.len());
    for (i, row) in rows.iter().enumerate() {
        queue!(
            out,
            MoveTo(0, (top_pad + i) as u16),
            Print(pad_or_trim(row, width))
        )?;
    }

    // Clock sits right-aligned in the bar.
    let clock = super::text::hhmm_now();
    let mut bar = pad_or_trim(
        &status_bar_text(store, connection),
        width.saturating_sub(clock.len() + 1),
    );
    if width > clock.len() {
        bar.push(' ');
        bar.push_str(&clock);
    }
    queue!(
        out,
        MoveTo(0, height.saturating_sub(2)),
        SetAttribute(Attribute::Reverse),
        Print(pad_or_trim(&bar, width)),
        SetAttribute(Attribute::Reset),
    )?;

    // Show the tail of the input when it outgrows the window.
    let prompt = format!("> {}", input);
    let shown = if super::text::display_width(&prompt) > width {
        let mut tail = String::new();
        let mut cols = 0;
        for ch in prompt.chars().rev() {
            let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if cols + w > width {
                break;
            }
            tail.insert(0, ch);
            cols += w;
        }
        tail
    } else {
        prompt
    };
    queue!(
        out,
        MoveTo(0, height.saturating_sub(1)),
        Print(pad_or_trim(&shown, width)),
    )?;

    out.flush()
}
