//! Error types for the client.
//!
//! Three families: connection/transport errors (fatal to the session),
//! buffer-store errors (always recoverable), and slash-command errors
//! (user-visible, surfaced as a line in the `"status"` buffer).

use thiserror::Error;

/// Errors raised while establishing or using the network transport.
///
/// Every variant is fatal to the session: the event loop exits and the
/// single teardown path runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// DNS resolution of the server host failed.
    #[error("failed to resolve {host}: {source}")]
    ResolveFailed {
        /// The host that could not be resolved.
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection could not be established.
    #[error("failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake failed after the TCP connect succeeded.
    #[error("TLS handshake with {host} failed: {source}")]
    TlsHandshakeFailed {
        /// Target host.
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// EOF or a read/write error on an established connection.
    #[error("transport broken: {0}")]
    Broken(#[from] std::io::Error),
}

/// Errors encountered when decoding a framed IRC line.
///
/// Never fatal: the session engine shows the raw line in `"status"`
/// and skips routing for it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty after stripping CRLF.
    #[error("empty message")]
    EmptyMessage,

    /// The prefix was present but malformed.
    #[error("invalid prefix")]
    InvalidPrefix,

    /// The command token was missing or contained invalid characters.
    #[error("invalid command")]
    InvalidCommand,

    /// Unparseable bytes remained after the parameter list.
    #[error("trailing garbage after parameters")]
    TrailingGarbage,
}

/// Errors raised by [`BufferStore`](crate::buffers::BufferStore) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// A buffer with this name already exists.
    #[error("buffer already exists: {0}")]
    DuplicateName(String),

    /// The `"status"` buffer cannot be removed.
    #[error("the status buffer is reserved")]
    Reserved,
}

/// Errors raised while interpreting a slash-command.
///
/// These never terminate the session; each maps to a one-line usage
/// message appended to the `"status"` buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandError {
    /// The command keyword is not in the dispatch table.
    #[error("Unknown command: /{0}")]
    Unknown(String),

    /// A required argument was not supplied.
    #[error("Usage: {usage}")]
    MissingArg {
        /// Usage line for the failing command.
        usage: &'static str,
    },

    /// A contextual argument was omitted and the active buffer cannot
    /// supply a well-typed value.
    #[error("Usage: {usage}")]
    WrongContext {
        /// Usage line for the failing command.
        usage: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_errors_render_as_status_lines() {
        let err = CommandError::Unknown("frobnicate".into());
        assert_eq!(err.to_string(), "Unknown command: /frobnicate");

        let err = CommandError::MissingArg {
            usage: "/join <#channel>",
        };
        assert_eq!(err.to_string(), "Usage: /join <#channel>");
    }

    #[test]
    fn transport_errors_chain_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::ConnectFailed {
            host: "irc.example".into(),
            port: 6697,
            source: io,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("irc.example:6697"));
    }
}
