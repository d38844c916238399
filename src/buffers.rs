//! The display-buffer store.
//!
//! A session owns one [`BufferStore`]: a named, ordered, cyclic
//! collection of scrollback buffers. The store always contains the
//! reserved `"status"` buffer, exactly one buffer is active, and
//! channel names compare under RFC 1459 case mapping while keeping
//! their original spelling for display.
//!
//! Buffers live in an index-addressed arena (a vector); `active`,
//! `next` and `prev` are positions in that vector, which is also the
//! cycle order for Alt-j / Alt-k navigation. A separate map from
//! canonical name to position serves lookup.

use std::collections::{HashMap, VecDeque};

use crate::casemap::{irc_to_lower, is_channel_name};
use crate::error::BufferError;
use crate::ui::text::wrap_columns;

/// Name of the reserved server/system buffer.
pub const STATUS_BUFFER: &str = "status";

/// Lines retained per buffer; the oldest line is dropped beyond this.
pub const SCROLLBACK_LINES: usize = 1000;

/// Handle into the store's arena.
pub type BufferId = usize;

/// A single named scrollback buffer.
#[derive(Debug)]
pub struct Buffer {
    name: String,
    lines: VecDeque<String>,
    /// Scroll position in displayed rows, measured from the bottom.
    scroll_offset: usize,
    /// Records the user's intent: new lines auto-scroll only while true.
    at_bottom: bool,
    unread: usize,
}

impl Buffer {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: VecDeque::new(),
            scroll_offset: 0,
            at_bottom: true,
            unread: 0,
        }
    }

    /// Buffer name with its original spelling.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for channel buffers (`#`/`&` prefix).
    pub fn is_channel(&self) -> bool {
        is_channel_name(&self.name)
    }

    /// Stored lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Current scroll position in displayed rows from the bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// True when the viewport is anchored to the newest line.
    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Lines appended since the buffer was last active.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Displayed row count of one stored line at text width `width`.
    ///
    /// Shares the renderer's wrap algorithm so scroll offsets count
    /// exactly the rows that get painted.
    fn displayed_rows(line: &str, width: usize) -> usize {
        wrap_columns(line, width).len()
    }

    /// Total displayed rows of the whole scrollback at text width `width`.
    pub fn total_display_rows(&self, width: usize) -> usize {
        self.lines
            .iter()
            .map(|l| Self::displayed_rows(l, width))
            .sum()
    }

    fn max_scroll(&self, width: usize, height: usize) -> usize {
        self.total_display_rows(width).saturating_sub(height)
    }

    fn clamp_scroll(&mut self, width: usize, height: usize) {
        let max = self.max_scroll(width, height);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
        self.at_bottom = self.scroll_offset == 0;
    }
}

/// Strip C0 controls (and DEL), keep other UTF-8, trim edge whitespace.
fn sanitize_line(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    cleaned.trim().to_string()
}

/// The ordered, cyclic collection of display buffers.
#[derive(Debug)]
pub struct BufferStore {
    buffers: Vec<Buffer>,
    /// Canonical name -> arena position.
    index: HashMap<String, BufferId>,
    active: BufferId,
    /// Content-area text width and height, updated by the renderer.
    text_width: usize,
    text_height: usize,
}

/// Canonical lookup key: RFC 1459 lowercase for channels, exact otherwise.
fn canonical_key(name: &str) -> String {
    if is_channel_name(name) {
        irc_to_lower(name)
    } else {
        name.to_string()
    }
}

impl BufferStore {
    /// Create a store holding only the active `"status"` buffer.
    pub fn new() -> Self {
        let mut store = Self {
            buffers: Vec::new(),
            index: HashMap::new(),
            active: 0,
            text_width: 80,
            text_height: 24,
        };
        store.buffers.push(Buffer::new(STATUS_BUFFER));
        store.index.insert(STATUS_BUFFER.to_string(), 0);
        store
    }

    /// Handle of the `"status"` buffer. Cheap: it is never removed and
    /// always sits at position zero.
    pub fn status(&self) -> BufferId {
        0
    }

    /// Handle of the active buffer.
    pub fn active(&self) -> BufferId {
        self.active
    }

    /// Number of buffers in the cycle.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// The store is never empty while a session is live.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Borrow a buffer by handle.
    pub fn get(&self, id: BufferId) -> &Buffer {
        &self.buffers[id]
    }

    /// Buffers in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter()
    }

    /// Tell the store the renderer's content-area geometry. Scroll
    /// offsets are re-clamped so every buffer stays in range.
    pub fn set_viewport(&mut self, text_width: usize, text_height: usize) {
        self.text_width = text_width.max(1);
        self.text_height = text_height.max(1);
        let (w, h) = (self.text_width, self.text_height);
        for buf in &mut self.buffers {
            buf.clamp_scroll(w, h);
        }
    }

    /// Create a new empty buffer at the end of the cycle.
    pub fn create(&mut self, name: &str) -> Result<BufferId, BufferError> {
        let key = canonical_key(name);
        if self.index.contains_key(&key) {
            return Err(BufferError::DuplicateName(name.to_string()));
        }
        let id = self.buffers.len();
        self.buffers.push(Buffer::new(name));
        self.index.insert(key, id);
        Ok(id)
    }

    /// Look a buffer up by name (channels case-insensitively).
    pub fn find(&self, name: &str) -> Option<BufferId> {
        self.index.get(&canonical_key(name)).copied()
    }

    /// Find a buffer or create it when absent.
    pub fn find_or_create(&mut self, name: &str) -> BufferId {
        match self.find(name) {
            Some(id) => id,
            None => self
                .create(name)
                .expect("absent name cannot collide"),
        }
    }

    /// Append a line to a buffer.
    ///
    /// The text is sanitized first; appending an empty result is a
    /// no-op. While the user sits at the bottom the viewport follows;
    /// otherwise the offset grows by the new line's displayed rows so
    /// the viewport stays anchored to the same historical line.
    pub fn append(&mut self, id: BufferId, text: &str) {
        let line = sanitize_line(text);
        if line.is_empty() {
            return;
        }
        let width = self.text_width;
        let height = self.text_height;
        let is_active = id == self.active;
        let buf = &mut self.buffers[id];

        if buf.lines.len() >= SCROLLBACK_LINES {
            buf.lines.pop_front();
        }
        let added_rows = Buffer::displayed_rows(&line, width);
        buf.lines.push_back(line);

        if !buf.at_bottom {
            buf.scroll_offset += added_rows;
        }
        buf.clamp_scroll(width, height);
        if buf.scroll_offset > 0 {
            // Clamping back to a positive offset keeps the anchor; the
            // intent flag must not flip just because rows were added.
            buf.at_bottom = false;
        }
        if !is_active {
            buf.unread += 1;
        }
    }

    /// Make a buffer the active one and clear its notification state.
    pub fn set_active(&mut self, id: BufferId) {
        self.active = id;
        self.buffers[id].unread = 0;
    }

    /// Remove a buffer from the cycle.
    ///
    /// Removing `"status"` is forbidden. When the active buffer is
    /// removed, its successor in the cycle becomes active; removing
    /// the last channel buffer therefore falls back to `"status"`.
    pub fn remove(&mut self, id: BufferId) -> Result<(), BufferError> {
        if id == self.status() {
            return Err(BufferError::Reserved);
        }
        self.buffers.remove(id);
        // Positions after the removed one shift down by one.
        self.index.clear();
        for (pos, buf) in self.buffers.iter().enumerate() {
            self.index.insert(canonical_key(&buf.name), pos);
        }
        if self.active == id {
            let next = if id < self.buffers.len() { id } else { 0 };
            self.set_active(next);
        } else if self.active > id {
            self.active -= 1;
        }
        Ok(())
    }

    /// Cycle the active buffer forward.
    pub fn next(&mut self) {
        let next = (self.active + 1) % self.buffers.len();
        self.set_active(next);
    }

    /// Cycle the active buffer backward.
    pub fn prev(&mut self) {
        let prev = (self.active + self.buffers.len() - 1) % self.buffers.len();
        self.set_active(prev);
    }

    /// Scroll the active buffer by `delta` displayed rows (positive =
    /// towards older lines), clamped into `[0, max_scroll]`.
    pub fn scroll_active(&mut self, delta: isize) {
        let (w, h) = (self.text_width, self.text_height);
        let buf = &mut self.buffers[self.active];
        let max = buf.max_scroll(w, h);
        let target = buf.scroll_offset as isize + delta;
        buf.scroll_offset = target.clamp(0, max as isize) as usize;
        buf.at_bottom = buf.scroll_offset == 0;
    }

    /// Snap the active buffer back to the newest line.
    pub fn scroll_active_to_bottom(&mut self) {
        let buf = &mut self.buffers[self.active];
        buf.scroll_offset = 0;
        buf.at_bottom = true;
    }

    /// Half-page scroll delta for the current viewport.
    pub fn half_page(&self) -> isize {
        (self.text_height / 2).max(1) as isize
    }

    /// Full-page scroll delta for the current viewport.
    pub fn full_page(&self) -> isize {
        self.text_height.saturating_sub(2).max(1) as isize
    }
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new()
    }
}
