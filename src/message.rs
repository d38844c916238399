//! IRC message model and line grammar.
//!
//! This module provides parsing of a single, already-framed IRC line
//! into its components using the nom parser combinator library, plus
//! the serialization used when writing the wire trace.
//!
//! IRC message format:
//! ```text
//! [:prefix] <command> [params...] [:trailing]
//! ```
//!
//! Parsing is pure: no I/O and no global state. The only failure mode
//! is a line that does not fit the grammar, which the session engine
//! still shows verbatim in the `"status"` buffer.

use std::fmt;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    error::Error as NomError,
    sequence::preceded,
    IResult,
};

use crate::error::MessageParseError;

/// Middle-parameter cap per RFC 2812.
pub const MAX_MIDDLE_PARAMS: usize = 15;

/// The source of an inbound message.
///
/// A prefix containing `!` carries `nick!user@host`; one without `!`
/// is a server name when it contains a `.` and a bare nickname
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prefix {
    /// A server origin, e.g. `irc.libera.chat`.
    Server(String),
    /// A user origin, decomposed from `nick[!user][@host]`.
    User {
        /// Sender nickname.
        nick: String,
        /// Ident/username, if present.
        user: Option<String>,
        /// Host, if present.
        host: Option<String>,
    },
}

impl Prefix {
    /// Decompose a raw prefix string (without the leading `:`).
    pub fn parse(raw: &str) -> Prefix {
        match raw.split_once('!') {
            Some((nick, rest)) => {
                let (user, host) = match rest.split_once('@') {
                    Some((user, host)) => (Some(user.to_string()), Some(host.to_string())),
                    None => (Some(rest.to_string()), None),
                };
                Prefix::User {
                    nick: nick.to_string(),
                    user,
                    host,
                }
            }
            None => match raw.split_once('@') {
                Some((nick, host)) => Prefix::User {
                    nick: nick.to_string(),
                    user: None,
                    host: Some(host.to_string()),
                },
                None if raw.contains('.') => Prefix::Server(raw.to_string()),
                None => Prefix::User {
                    nick: raw.to_string(),
                    user: None,
                    host: None,
                },
            },
        }
    }

    /// The sender nickname, when the prefix names a user.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::User { nick, .. } => Some(nick),
            Prefix::Server(_) => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Server(name) => write!(f, "{}", name),
            Prefix::User { nick, user, host } => {
                write!(f, "{}", nick)?;
                if let Some(user) = user {
                    write!(f, "!{}", user)?;
                }
                if let Some(host) = host {
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}

/// A decoded inbound IRC line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Optional source of the message.
    pub prefix: Option<Prefix>,
    /// Command word (e.g. `PRIVMSG`) or three-digit numeric (e.g. `001`).
    pub command: String,
    /// Middle parameters, in order, capped at [`MAX_MIDDLE_PARAMS`].
    pub params: Vec<String>,
    /// Trailing parameter (after `" :"`); may be empty, may contain spaces.
    pub trailing: Option<String>,
}

type ParseResult<'a, O> = IResult<&'a str, O, NomError<&'a str>>;

/// Parse the message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> ParseResult<'_, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (letters or digits).
fn parse_command(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

impl Message {
    /// Parse one CRLF-stripped line.
    ///
    /// Any trailing `\r`/`\n` bytes are tolerated and ignored so the
    /// framing layer may hand over lines with or without terminators.
    pub fn parse(line: &str) -> Result<Message, MessageParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let (rest, prefix) =
            opt(parse_prefix)(line).map_err(|_| MessageParseError::InvalidPrefix)?;
        // Additional spaces after the prefix are skipped before the command.
        let (rest, _) = space0::<_, NomError<&str>>(rest)
            .map_err(|_| MessageParseError::InvalidCommand)?;
        let (rest, command) =
            parse_command(rest).map_err(|_| MessageParseError::InvalidCommand)?;

        let mut params: Vec<String> = Vec::new();
        let mut trailing: Option<String> = None;
        let mut rest = rest;

        while let Some(stripped) = rest.strip_prefix(' ') {
            if let Some(tail) = stripped.strip_prefix(':') {
                trailing = Some(tail.to_string());
                rest = "";
                break;
            }
            if params.len() == MAX_MIDDLE_PARAMS {
                // RFC 2812 caps middle parameters; the remainder is
                // absorbed as the trailing parameter.
                trailing = Some(stripped.to_string());
                rest = "";
                break;
            }
            let end = stripped.find(' ').unwrap_or(stripped.len());
            let param = &stripped[..end];
            if param.is_empty() {
                break;
            }
            params.push(param.to_string());
            rest = &stripped[end..];
        }

        if !rest.is_empty() && rest != " " {
            return Err(MessageParseError::TrailingGarbage);
        }

        Ok(Message {
            prefix: prefix.map(Prefix::parse),
            command: command.to_string(),
            params,
            trailing,
        })
    }

    /// True when the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.chars().all(|c| c.is_ascii_digit())
    }

    /// First middle parameter, if any.
    pub fn first_param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// Sender nickname from the prefix, if the prefix names a user.
    pub fn sender_nick(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl fmt::Display for Message {
    /// Serialize without the CRLF terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        write!(f, "{}", self.command)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        if let Some(trailing) = &self.trailing {
            write!(f, " :{}", trailing)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}
