//! The slash-command interpreter.
//!
//! A user line beginning with `/` is a command; `//` escapes a literal
//! leading slash; anything else is plain text for the active buffer.
//! Commands are resolved against a static, data-driven table of
//! argument descriptors and handler functions, so adding a command is
//! one table row plus a handler.

use crate::buffers::{BufferStore, STATUS_BUFFER};
use crate::casemap::is_channel_name;
use crate::error::CommandError;
use crate::session::Session;

/// What the event loop should do after dispatching a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEffect {
    /// Keep running.
    Continue,
    /// Graceful shutdown was requested.
    Quit,
}

/// Argument value category, used by contextual resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// A `#`/`&`-prefixed channel name.
    Channel,
    /// A nickname.
    Nickname,
    /// A `nick!user@host` mask.
    Hostmask,
    /// Free text; absorbs the remainder of the line.
    FreeText,
}

/// Whether an argument may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgNecessity {
    /// Must be supplied.
    Required,
    /// May be omitted.
    Optional,
    /// May be omitted if the active buffer supplies a well-typed
    /// value; otherwise treated as required.
    Contextual,
}

/// One argument descriptor in a command's table entry.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    /// Argument name, for usage lines.
    pub name: &'static str,
    /// Value category.
    pub ty: ArgType,
    /// Omission rule.
    pub necessity: ArgNecessity,
}

type Handler = fn(&mut Session, &mut BufferStore, &[&str]) -> Result<DispatchEffect, CommandError>;

/// A command table entry.
pub struct CommandDef {
    /// Keyword, canonical lowercase.
    pub name: &'static str,
    /// One-line usage text shown on argument errors.
    pub usage: &'static str,
    /// Ordered argument descriptors.
    pub args: &'static [ArgSpec],
    handler: Handler,
}

/// The static command table. Keywords are matched case-insensitively.
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "join",
        usage: "/join <#channel>",
        args: &[ArgSpec {
            name: "channel",
            ty: ArgType::Channel,
            necessity: ArgNecessity::Required,
        }],
        handler: handle_join,
    },
    CommandDef {
        name: "part",
        usage: "/part [<#channel>] [<message>]",
        args: &[
            ArgSpec {
                name: "channel",
                ty: ArgType::Channel,
                necessity: ArgNecessity::Contextual,
            },
            ArgSpec {
                name: "message",
                ty: ArgType::FreeText,
                necessity: ArgNecessity::Optional,
            },
        ],
        handler: handle_part,
    },
    CommandDef {
        name: "nick",
        usage: "/nick <new-nick>",
        args: &[ArgSpec {
            name: "new-nick",
            ty: ArgType::Nickname,
            necessity: ArgNecessity::Required,
        }],
        handler: handle_nick,
    },
    CommandDef {
        name: "msg",
        usage: "/msg <nick> <message>",
        args: &[
            ArgSpec {
                name: "nick",
                ty: ArgType::Nickname,
                necessity: ArgNecessity::Required,
            },
            ArgSpec {
                name: "message",
                ty: ArgType::FreeText,
                necessity: ArgNecessity::Required,
            },
        ],
        handler: handle_msg,
    },
    CommandDef {
        name: "quit",
        usage: "/quit [<reason>]",
        args: &[ArgSpec {
            name: "reason",
            ty: ArgType::FreeText,
            necessity: ArgNecessity::Optional,
        }],
        handler: handle_quit,
    },
];

/// Dispatch one submitted input line.
///
/// Plain text becomes a PRIVMSG to the active buffer (or a raw server
/// line when `"status"` is active); `/`-lines go through the command
/// table; command errors become one-line usage messages in `"status"`.
pub fn dispatch_line(
    session: &mut Session,
    store: &mut BufferStore,
    line: &str,
) -> DispatchEffect {
    if line.is_empty() {
        return DispatchEffect::Continue;
    }

    if let Some(escaped) = line.strip_prefix("//") {
        // Literal text whose leading slash is preserved.
        return send_text(session, store, &format!("/{}", escaped));
    }

    let Some(body) = line.strip_prefix('/') else {
        return send_text(session, store, line);
    };

    let mut tokens = body.splitn(16, ' ').filter(|t| !t.is_empty());
    let Some(name) = tokens.next() else {
        return DispatchEffect::Continue;
    };
    let args: Vec<&str> = tokens.collect();

    let name_lower = name.to_ascii_lowercase();
    let Some(def) = COMMANDS.iter().find(|def| def.name == name_lower) else {
        store.append(
            store.status(),
            &CommandError::Unknown(name_lower).to_string(),
        );
        return DispatchEffect::Continue;
    };

    // Table-level validation: every Required descriptor must have a
    // token. Contextual and Optional are resolved by the handler.
    for (i, spec) in def.args.iter().enumerate() {
        if spec.necessity == ArgNecessity::Required && args.len() <= i {
            store.append(
                store.status(),
                &CommandError::MissingArg { usage: def.usage }.to_string(),
            );
            return DispatchEffect::Continue;
        }
    }

    match (def.handler)(session, store, &args) {
        Ok(effect) => effect,
        Err(err) => {
            store.append(store.status(), &err.to_string());
            DispatchEffect::Continue
        }
    }
}

/// Plain-text path: PRIVMSG to the active channel or private buffer,
/// or a raw server line when the `"status"` buffer is active.
fn send_text(session: &mut Session, store: &mut BufferStore, text: &str) -> DispatchEffect {
    let active = store.active();
    let name = store.get(active).name().to_string();
    if name == STATUS_BUFFER {
        session.send_line(store, text.to_string());
        return DispatchEffect::Continue;
    }
    session.send_line(store, format!("PRIVMSG {} :{}", name, text));
    let echo = format!("<{}> {}", session.nickname(), text);
    store.append(active, &echo);
    store.scroll_active_to_bottom();
    DispatchEffect::Continue
}

fn handle_join(
    session: &mut Session,
    store: &mut BufferStore,
    args: &[&str],
) -> Result<DispatchEffect, CommandError> {
    // The buffer is created when the server echoes our JOIN back.
    session.send_line(store, format!("JOIN {}", args[0]));
    Ok(DispatchEffect::Continue)
}

fn handle_part(
    session: &mut Session,
    store: &mut BufferStore,
    args: &[&str],
) -> Result<DispatchEffect, CommandError> {
    // The channel argument is contextual: an explicit `#`/`&` token
    // wins, otherwise the active buffer supplies it when it is a
    // channel. Validity is judged by prefix, not by having joined.
    let (channel, message_args) = match args.first() {
        Some(first) if is_channel_name(first) => (first.to_string(), &args[1..]),
        _ => {
            let active = store.get(store.active());
            if active.is_channel() {
                (active.name().to_string(), args)
            } else {
                return Err(CommandError::WrongContext {
                    usage: "/part [<#channel>] [<message>]",
                });
            }
        }
    };
    let message = message_args.join(" ");

    session.send_line(store, format!("PART {} :{}", channel, message));
    if let Some(id) = store.find(&channel) {
        let _ = store.remove(id);
    }
    Ok(DispatchEffect::Continue)
}

fn handle_nick(
    session: &mut Session,
    store: &mut BufferStore,
    args: &[&str],
) -> Result<DispatchEffect, CommandError> {
    // The local nickname updates only once the server confirms.
    session.send_line(store, format!("NICK {}", args[0]));
    Ok(DispatchEffect::Continue)
}

fn handle_msg(
    session: &mut Session,
    store: &mut BufferStore,
    args: &[&str],
) -> Result<DispatchEffect, CommandError> {
    let target = args[0];
    let text = args[1..].join(" ");
    session.send_line(store, format!("PRIVMSG {} :{}", target, text));
    let id = store.find_or_create(target);
    let echo = format!("<{}> {}", session.nickname(), text);
    store.append(id, &echo);
    Ok(DispatchEffect::Continue)
}

fn handle_quit(
    session: &mut Session,
    store: &mut BufferStore,
    args: &[&str],
) -> Result<DispatchEffect, CommandError> {
    session.quit(store, &args.join(" "));
    Ok(DispatchEffect::Quit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;

    fn fixture() -> (Session, BufferStore) {
        let identity = Identity {
            nickname: "chatter_user".into(),
            username: "chatter_user".into(),
            realname: "chatter_user".into(),
            channel: "#chatter".into(),
            server: "irc.example".into(),
            pass: None,
        };
        let mut store = BufferStore::new();
        store.set_viewport(80, 24);
        (Session::new(identity), store)
    }

    fn join_channel(session: &mut Session, store: &mut BufferStore) {
        session.feed_inbound(store, b":chatter_user!u@h JOIN #chatter\r\n");
        session.take_outbound();
    }

    fn status_lines(store: &BufferStore) -> Vec<&str> {
        store.get(store.status()).lines().collect()
    }

    #[test]
    fn plain_text_in_channel_sends_privmsg_with_local_echo() {
        let (mut s, mut store) = fixture();
        join_channel(&mut s, &mut store);
        dispatch_line(&mut s, &mut store, "hello there");
        assert_eq!(s.take_outbound(), vec!["PRIVMSG #chatter :hello there"]);
        let id = store.find("#chatter").unwrap();
        assert_eq!(
            store.get(id).lines().last(),
            Some("<chatter_user> hello there")
        );
    }

    #[test]
    fn plain_text_in_status_goes_out_as_raw_line() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "MODE #chatter +o alice");
        assert_eq!(s.take_outbound(), vec!["MODE #chatter +o alice"]);
    }

    #[test]
    fn double_slash_escapes_a_literal_slash() {
        let (mut s, mut store) = fixture();
        join_channel(&mut s, &mut store);
        dispatch_line(&mut s, &mut store, "//me waves");
        assert_eq!(s.take_outbound(), vec!["PRIVMSG #chatter :/me waves"]);
        let id = store.find("#chatter").unwrap();
        assert_eq!(store.get(id).lines().last(), Some("<chatter_user> /me waves"));
    }

    #[test]
    fn join_emits_without_creating_a_local_buffer() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/join #rust");
        assert_eq!(s.take_outbound(), vec!["JOIN #rust"]);
        assert!(store.find("#rust").is_none());
    }

    #[test]
    fn join_without_argument_prints_usage() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/join");
        assert!(s.take_outbound().is_empty());
        assert!(status_lines(&store).contains(&"Usage: /join <#channel>"));
    }

    #[test]
    fn part_defaults_to_the_active_channel() {
        let (mut s, mut store) = fixture();
        join_channel(&mut s, &mut store);
        let effect = dispatch_line(&mut s, &mut store, "/part bye bye");
        assert_eq!(effect, DispatchEffect::Continue);
        assert_eq!(s.take_outbound(), vec!["PART #chatter :bye bye"]);
        assert!(store.find("#chatter").is_none());
        assert_eq!(store.active(), store.status());
    }

    #[test]
    fn part_accepts_an_explicit_channel_not_joined() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/part #elsewhere so long");
        assert_eq!(s.take_outbound(), vec!["PART #elsewhere :so long"]);
    }

    #[test]
    fn part_in_status_without_channel_is_a_context_error() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/part");
        assert!(s.take_outbound().is_empty());
        assert!(status_lines(&store)
            .contains(&"Usage: /part [<#channel>] [<message>]"));
    }

    #[test]
    fn nick_does_not_update_local_nickname_on_send() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/nick chatty");
        assert_eq!(s.take_outbound(), vec!["NICK chatty"]);
        assert_eq!(s.nickname(), "chatter_user");
    }

    #[test]
    fn msg_opens_a_private_buffer_with_echo() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/msg bob hi there");
        assert_eq!(s.take_outbound(), vec!["PRIVMSG bob :hi there"]);
        let id = store.find("bob").unwrap();
        assert_eq!(store.get(id).lines().last(), Some("<chatter_user> hi there"));
    }

    #[test]
    fn quit_requests_shutdown() {
        let (mut s, mut store) = fixture();
        let effect = dispatch_line(&mut s, &mut store, "/quit gone fishing");
        assert_eq!(effect, DispatchEffect::Quit);
        assert_eq!(s.take_outbound(), vec!["QUIT :gone fishing"]);
    }

    #[test]
    fn commands_match_case_insensitively() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/JOIN #rust");
        assert_eq!(s.take_outbound(), vec!["JOIN #rust"]);
    }

    #[test]
    fn unknown_command_is_reported_and_not_sent() {
        let (mut s, mut store) = fixture();
        dispatch_line(&mut s, &mut store, "/frobnicate now");
        assert!(s.take_outbound().is_empty());
        assert!(status_lines(&store).contains(&"Unknown command: /frobnicate"));
    }
}
