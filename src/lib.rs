//! # chatter
//!
//! A small text-mode IRC client: connect to a server, register, join a
//! channel, and chat from the terminal.
//!
//! The crate splits into a transport-free protocol core and a thin
//! terminal shell around it:
//!
//! - [`message`] and [`framing`]: RFC 1459 message parsing and CRLF
//!   line framing over a byte stream
//! - [`session`]: the registration state machine and inbound routing,
//!   operating purely on bytes in and queued lines out
//! - [`buffers`]: per-conversation scrollback with display-row
//!   scrolling and unread counts
//! - [`commands`]: the slash-command interpreter
//! - [`transport`]: TCP and TLS connections with keepalive
//! - [`input`], [`ui`], [`app`]: the terminal event loop
//!
//! The core never touches a socket, so every routing and command
//! behavior is testable without I/O.

#![deny(clippy::all)]

pub mod app;
pub mod buffers;
pub mod casemap;
pub mod commands;
pub mod config;
pub mod error;
pub mod framing;
pub mod input;
pub mod message;
pub mod session;
pub mod transport;
pub mod ui;

pub use buffers::{BufferId, BufferStore, STATUS_BUFFER};
pub use error::{BufferError, CommandError, MessageParseError, TransportError};
pub use framing::LineBuffer;
pub use message::{Message, Prefix};
pub use session::{Identity, RegistrationState, Session};
