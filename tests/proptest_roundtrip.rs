//! Property-based tests for message parsing and line framing.
//!
//! Uses proptest to generate random message components and verify that:
//! 1. Parsing never panics, on well-formed or arbitrary input
//! 2. Serialized messages re-parse to the same value (roundtrip)
//! 3. Framing yields the same lines regardless of chunk boundaries

use proptest::prelude::*;

use chatter::{LineBuffer, Message, Prefix};

// =============================================================================
// STRATEGIES - Generators for valid message components
// =============================================================================

/// Valid IRC nickname: starts with letter or special char, followed by
/// letters, digits, or special chars. Max 9 chars per RFC 2812.
fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

/// Valid ident: alphanumeric, no spaces or @ or !
fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

/// Valid hostname: simplified, always contains a dot
fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)+").expect("valid regex")
}

/// Channel name: starts with # or &
fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,49}").expect("valid regex")
}

/// Command word: alphabetic or a three-digit numeric
fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Z]{3,10}").expect("valid regex"),
        prop::string::string_regex("[0-9]{3}").expect("valid regex"),
    ]
}

/// A middle parameter: non-empty, no space, no leading colon
fn param_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9#&_\\-]{1,20}").expect("valid regex")
}

/// Trailing text: anything except CR, LF, NUL
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

/// Generate a valid Prefix
fn prefix_strategy() -> impl Strategy<Value = Prefix> {
    prop_oneof![
        hostname_strategy().prop_map(Prefix::Server),
        (
            nickname_strategy(),
            username_strategy(),
            hostname_strategy()
        )
            .prop_map(|(nick, user, host)| Prefix::User {
                nick,
                user: Some(user),
                host: Some(host),
            }),
    ]
}

/// Generate a complete valid Message
fn message_strategy() -> impl Strategy<Value = Message> {
    (
        prop::option::of(prefix_strategy()),
        command_strategy(),
        prop::collection::vec(param_strategy(), 0..6),
        prop::option::of(trailing_strategy()),
    )
        .prop_map(|(prefix, command, params, trailing)| Message {
            prefix,
            command,
            params,
            trailing,
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The fundamental roundtrip property: serialize then parse = identity
    #[test]
    fn message_roundtrip(msg in message_strategy()) {
        let serialized = msg.to_string();
        let parsed: Message = serialized.parse()
            .expect("serialized message should be parseable");
        prop_assert_eq!(&msg, &parsed,
            "roundtrip failed for serialized: {}", serialized);
    }

    /// Prefix roundtrip: any generated prefix survives serialization
    #[test]
    fn prefix_roundtrip(prefix in prefix_strategy()) {
        let serialized = prefix.to_string();
        let parsed = Prefix::parse(&serialized);
        prop_assert_eq!(&prefix, &parsed,
            "prefix roundtrip failed for: {}", serialized);
    }

    /// PRIVMSG with arbitrary (valid) content should roundtrip
    #[test]
    fn privmsg_roundtrip(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy(),
        target in channel_strategy(),
        text in trailing_strategy()
    ) {
        let msg = Message {
            prefix: Some(Prefix::User {
                nick,
                user: Some(user),
                host: Some(host),
            }),
            command: "PRIVMSG".to_string(),
            params: vec![target],
            trailing: Some(text),
        };

        let serialized = msg.to_string();
        let parsed: Message = serialized.parse().expect("PRIVMSG should parse");
        prop_assert_eq!(msg, parsed);
    }

    /// Parsing must never panic, even on arbitrary garbage
    #[test]
    fn parse_never_panics(line in "[^\r\n]{0,512}") {
        let _ = Message::parse(&line);
    }

    /// Sender nickname extraction from a full user prefix
    #[test]
    fn sender_nick_extraction(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy()
    ) {
        let msg = Message {
            prefix: Some(Prefix::User {
                nick: nick.clone(),
                user: Some(user),
                host: Some(host),
            }),
            command: "PING".to_string(),
            params: vec![],
            trailing: Some("test".to_string()),
        };
        prop_assert_eq!(msg.sender_nick(), Some(nick.as_str()));
    }
}

// =============================================================================
// FRAMING PROPERTIES
// =============================================================================

proptest! {
    /// Chunk boundaries never change the decoded line sequence, even
    /// when a chunk splits the CRLF pair or a multi-byte character.
    #[test]
    fn framing_is_chunk_size_invariant(
        lines in prop::collection::vec("[^\r\n\0]{0,80}", 1..8),
        chunk in 1usize..16,
    ) {
        let mut wire = Vec::new();
        for line in &lines {
            wire.extend_from_slice(line.as_bytes());
            wire.extend_from_slice(b"\r\n");
        }

        let mut whole = LineBuffer::new();
        whole.feed(&wire);
        let mut expected = Vec::new();
        while let Some(line) = whole.next_line() {
            expected.push(line);
        }

        let mut chunked = LineBuffer::new();
        let mut got = Vec::new();
        for piece in wire.chunks(chunk) {
            chunked.feed(piece);
            while let Some(line) = chunked.next_line() {
                got.push(line);
            }
        }

        prop_assert_eq!(&expected, &lines);
        prop_assert_eq!(got, expected);
        prop_assert!(chunked.residual().is_empty());
    }

    /// Bytes after the last CRLF stay buffered, unmodified.
    #[test]
    fn framing_keeps_partial_tail(
        line in "[a-zA-Z0-9 ]{0,80}",
        tail in "[a-zA-Z0-9 ]{1,40}",
    ) {
        let mut buf = LineBuffer::new();
        buf.feed(line.as_bytes());
        buf.feed(b"\r\n");
        buf.feed(tail.as_bytes());

        let got = buf.next_line();
        prop_assert_eq!(got.as_deref(), Some(line.as_str()));
        prop_assert_eq!(buf.next_line(), None);
        prop_assert_eq!(buf.residual(), tail.as_bytes());
    }
}
