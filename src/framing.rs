//! CRLF framing over a growable receive buffer.
//!
//! The session engine appends raw transport bytes with [`LineBuffer::feed`]
//! and drains complete lines with [`LineBuffer::next_line`]. Everything
//! after the final CRLF is retained verbatim for the next feed, so a
//! message split at any byte boundary reassembles identically.
//!
//! A lone LF is not a terminator. There is no error mode other than
//! "need more bytes", which is implicit in the retained tail.

use bytes::{Buf, BytesMut};

/// Accumulates raw bytes and yields CRLF-terminated lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    /// Create an empty line buffer.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(8192),
        }
    }

    /// Append raw bytes received from the transport.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its CRLF terminator.
    ///
    /// Returns `None` when no full CRLF-terminated line is buffered.
    /// Non-UTF-8 bytes are replaced rather than rejected; oversized
    /// lines are not an error.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.windows(2).position(|w| w == b"\r\n")?;
        let line = String::from_utf8_lossy(&self.buf[..end]).into_owned();
        self.buf.advance(end + 2);
        Some(line)
    }

    /// Bytes retained after the final CRLF.
    pub fn residual(&self) -> &[u8] {
        &self.buf
    }
}
