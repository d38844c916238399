//! Text measurement helpers for the renderer.
//!
//! All arithmetic is in display columns (wcwidth-style), not bytes:
//! a CJK character occupies two columns, combining marks zero.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display-column width of a string.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Hard-wrap a line into rows of at most `width` display columns.
///
/// Always yields at least one row. Wide characters never straddle a
/// row boundary.
pub fn wrap_columns(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut cols = 0usize;

    for ch in line.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            cols = 0;
        }
        current.push(ch);
        cols += w;
    }
    rows.push(current);
    rows
}

/// Truncate to at most `width` display columns, then right-pad with
/// spaces to exactly `width`.
pub fn pad_or_trim(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut cols = 0usize;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > width {
            break;
        }
        out.push(ch);
        cols += w;
    }
    while cols < width {
        out.push(' ');
        cols += 1;
    }
    out
}

/// `HH:MM` clock for the status bar.
pub fn hhmm_now() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
