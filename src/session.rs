//! The IRC session engine.
//!
//! Owns the registration state machine, the inbound receive buffer,
//! and the routing of parsed messages into the buffer store. The
//! engine itself performs no I/O: inbound transport bytes are pushed
//! through [`Session::feed_inbound`] and outbound lines accumulate in
//! a queue the event loop drains to the transport. This keeps every
//! protocol scenario testable as bytes-in, lines-out.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::buffers::BufferStore;
use crate::casemap::is_channel_name;
use crate::message::Message;

/// The user identity and connection parameters, resolved by the launcher.
#[derive(Debug, Clone)]
pub struct Identity {
    /// IRC nickname; updated only on server-confirmed NICK.
    pub nickname: String,
    /// USER name.
    pub username: String,
    /// Realname sent in USER.
    pub realname: String,
    /// Channel to JOIN once registered.
    pub channel: String,
    /// Server hostname, for the status bar.
    pub server: String,
    /// Optional server password, sent as PASS before NICK/USER.
    pub pass: Option<String>,
}

/// Registration progress of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// No transport.
    Disconnected,
    /// Socket opening / TLS handshake in flight.
    Connecting,
    /// NICK/USER sent, waiting for 001 or 376.
    Registering,
    /// Welcome numeric seen; JOIN sent.
    Registered,
}

/// The session engine.
pub struct Session {
    identity: Identity,
    state: RegistrationState,
    rx: crate::framing::LineBuffer,
    outbound: VecDeque<String>,
}

impl Session {
    /// Create a disconnected session for `identity`.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            state: RegistrationState::Disconnected,
            rx: crate::framing::LineBuffer::new(),
            outbound: VecDeque::new(),
        }
    }

    /// Current registration state.
    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// Our current nickname (server-confirmed).
    pub fn nickname(&self) -> &str {
        &self.identity.nickname
    }

    /// Server hostname for the status bar.
    pub fn server(&self) -> &str {
        &self.identity.server
    }

    /// The channel joined at registration.
    pub fn initial_channel(&self) -> &str {
        &self.identity.channel
    }

    /// The transport began connecting.
    pub fn on_connecting(&mut self) {
        self.state = RegistrationState::Connecting;
    }

    /// The transport is up and writable: send the registration burst.
    pub fn on_connected(&mut self, store: &mut BufferStore) {
        self.state = RegistrationState::Registering;
        if let Some(pass) = self.identity.pass.clone() {
            self.send_line(store, format!("PASS {}", pass));
        }
        self.send_line(store, format!("NICK {}", self.identity.nickname));
        self.send_line(
            store,
            format!(
                "USER {} 0 * :{}",
                self.identity.username, self.identity.realname
            ),
        );
    }

    /// The transport hit EOF or a fatal error.
    pub fn on_disconnected(&mut self, store: &mut BufferStore) {
        self.state = RegistrationState::Disconnected;
        store.append(store.status(), "Disconnected");
    }

    /// Queue an outbound line (no CRLF) and echo it to `"status"`.
    pub fn send_line(&mut self, store: &mut BufferStore, line: String) {
        debug!(line = %line, "send");
        store.append(store.status(), &format!("-> {}", line));
        self.outbound.push_back(line);
    }

    /// Queue a graceful QUIT.
    pub fn quit(&mut self, store: &mut BufferStore, reason: &str) {
        let line = if reason.is_empty() {
            "QUIT :leaving".to_string()
        } else {
            format!("QUIT :{}", reason)
        };
        self.send_line(store, line);
    }

    /// Drain queued outbound lines, in order.
    pub fn take_outbound(&mut self) -> Vec<String> {
        self.outbound.drain(..).collect()
    }

    /// True when outbound lines are waiting for the transport.
    pub fn has_outbound(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Feed raw transport bytes; parses and routes every complete line.
    pub fn feed_inbound(&mut self, store: &mut BufferStore, bytes: &[u8]) {
        self.rx.feed(bytes);
        while let Some(line) = self.rx.next_line() {
            self.handle_line(store, &line);
        }
    }

    fn handle_line(&mut self, store: &mut BufferStore, line: &str) {
        debug!(line = %line, "recv");

        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(_) => {
                // Malformed lines are never fatal: show them verbatim
                // and skip routing.
                store.append(store.status(), line);
                return;
            }
        };

        // PONG replies bypass the registration gate and precede any
        // other outbound traffic.
        if msg.command == "PING" {
            let token = msg
                .trailing
                .as_deref()
                .or_else(|| msg.first_param())
                .unwrap_or_default();
            store.append(store.status(), line);
            self.send_line(store, format!("PONG :{}", token));
            return;
        }

        // Raw protocol trace, except NOTICE whose status-formatted
        // rendition below replaces it (no duplicates in "status").
        if msg.command != "NOTICE" {
            store.append(store.status(), line);
        }

        match msg.command.as_str() {
            "PRIVMSG" => self.route_privmsg(store, &msg),
            "NOTICE" => {
                let mut parts: Vec<&str> = msg.params.iter().map(String::as_str).collect();
                if let Some(t) = msg.trailing.as_deref() {
                    parts.push(t);
                }
                store.append(store.status(), &format!("-!- {}", parts.join(" ")));
            }
            "JOIN" => self.route_join(store, &msg),
            "PART" => self.route_part(store, &msg),
            "KICK" => self.route_kick(store, &msg),
            "NICK" => self.route_nick(store, &msg),
            "001" | "376" => {
                if self.state == RegistrationState::Registering {
                    info!(channel = %self.identity.channel, "registered");
                    self.state = RegistrationState::Registered;
                    let channel = self.identity.channel.clone();
                    self.send_line(store, format!("JOIN {}", channel));
                }
            }
            _ => {}
        }
    }

    fn route_privmsg(&mut self, store: &mut BufferStore, msg: &Message) {
        let Some(target) = msg.first_param() else {
            return;
        };
        let sender = msg.sender_nick().unwrap_or("?").to_string();
        let text = msg.trailing.as_deref().unwrap_or_default();
        let formatted = format!("<{}> {}", sender, text);

        if is_channel_name(target) {
            let id = store.find_or_create(target);
            store.append(id, &formatted);
        } else if target == self.identity.nickname {
            // Private conversation, keyed by the sender's nickname.
            let id = store.find_or_create(&sender);
            store.append(id, &formatted);
        }
        // Any other target: the raw trace in "status" already covers
        // it, and a second formatted copy there is forbidden.
    }

    fn route_join(&mut self, store: &mut BufferStore, msg: &Message) {
        let Some(channel) = msg.first_param().or(msg.trailing.as_deref()) else {
            return;
        };
        let Some(sender) = msg.sender_nick().map(str::to_string) else {
            return;
        };
        let joined = format!("{} has joined {}", sender, channel);
        if sender == self.identity.nickname {
            let id = store.find_or_create(channel);
            store.set_active(id);
            store.append(id, &joined);
        } else if let Some(id) = store.find(channel) {
            store.append(id, &joined);
        }
    }

    fn route_part(&mut self, store: &mut BufferStore, msg: &Message) {
        let Some(channel) = msg.first_param().or(msg.trailing.as_deref()) else {
            return;
        };
        let Some(sender) = msg.sender_nick().map(str::to_string) else {
            return;
        };
        if sender == self.identity.nickname {
            if let Some(id) = store.find(channel) {
                store.append(store.status(), &format!("You have left {}", channel));
                let _ = store.remove(id);
            }
        } else if let Some(id) = store.find(channel) {
            let reason = msg.trailing.as_deref().unwrap_or_default();
            let line = if reason.is_empty() {
                format!("{} has left {}", sender, channel)
            } else {
                format!("{} has left {} ({})", sender, channel, reason)
            };
            store.append(id, &line);
        }
    }

    fn route_kick(&mut self, store: &mut BufferStore, msg: &Message) {
        let (Some(channel), Some(kicked)) = (msg.first_param(), msg.params.get(1)) else {
            return;
        };
        if kicked == &self.identity.nickname {
            if let Some(id) = store.find(channel) {
                store.append(store.status(), &format!("You were kicked from {}", channel));
                let _ = store.remove(id);
            }
        } else if let Some(id) = store.find(channel) {
            store.append(id, &format!("{} was kicked from {}", kicked, channel));
        }
    }

    fn route_nick(&mut self, store: &mut BufferStore, msg: &Message) {
        let Some(new_nick) = msg.first_param().or(msg.trailing.as_deref()) else {
            return;
        };
        // Our nickname changes only on the server's confirmation, not
        // when /nick is sent.
        if msg.sender_nick() == Some(self.identity.nickname.as_str()) {
            store.append(
                store.status(),
                &format!("You are now known as {}", new_nick),
            );
            self.identity.nickname = new_nick.to_string();
        }
    }
}
