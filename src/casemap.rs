//! IRC case-mapping functions.
//!
//! IRC channel names compare case-insensitively under the `rfc1459`
//! case mapping, where some punctuation characters are equivalent
//! (e.g. `[` and `{`). Buffer lookup uses these functions for channel
//! names while preserving the original spelling for display.

fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(irc_lower_char).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chars()
        .zip(b.chars())
        .all(|(ca, cb)| irc_lower_char(ca) == irc_lower_char(cb))
}

/// True if `name` denotes an IRC channel (`#` or `&` prefix).
pub fn is_channel_name(name: &str) -> bool {
    name.starts_with('#') || name.starts_with('&')
}

/// Buffer-name equality: channel names compare under RFC 1459 case
/// mapping, every other name (nicknames, `"status"`) compares exactly.
pub fn buffer_name_eq(a: &str, b: &str) -> bool {
    if is_channel_name(a) && is_channel_name(b) {
        irc_eq(a, b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_rfc1459_specials() {
        assert_eq!(irc_to_lower("Nick[A]\\~"), "nick{a}|^");
    }

    #[test]
    fn irc_eq_matches_bracket_variants() {
        assert!(irc_eq("#Foo[1]", "#foo{1}"));
        assert!(!irc_eq("#foo", "#fooo"));
    }

    #[test]
    fn channel_names_compare_case_insensitively() {
        assert!(buffer_name_eq("#Chatter", "#chatter"));
        assert!(buffer_name_eq("&ops", "&OPS"));
    }

    #[test]
    fn nicknames_compare_exactly() {
        assert!(!buffer_name_eq("Alice", "alice"));
        assert!(buffer_name_eq("status", "status"));
    }
}
