//! Command-line configuration.
//!
//! The launcher resolves flags into an [`Identity`] record the session
//! engine consumes; exit code 2 on invalid usage comes from clap.

use clap::{ArgAction, Parser};

use crate::session::Identity;

/// Default IRC server.
pub const DEFAULT_SERVER: &str = "irc.libera.chat";
/// Default port (TLS).
pub const DEFAULT_PORT: u16 = 6697;
/// Default nickname, username, realname.
pub const DEFAULT_NAME: &str = "chatter_user";
/// Default channel joined after registration.
pub const DEFAULT_CHANNEL: &str = "#chatter";

/// A multi-buffer terminal IRC client.
#[derive(Debug, Parser)]
#[command(
    name = "chatter",
    version,
    about = "A multi-buffer terminal IRC client",
    disable_version_flag = true
)]
pub struct Args {
    /// IRC server to connect to
    #[arg(long, short = 's', default_value = DEFAULT_SERVER)]
    pub server: String,

    /// TCP port
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Use SSL/TLS for the connection (default: enabled)
    #[arg(long, short = 'l', overrides_with = "no_ssl")]
    pub ssl: bool,

    /// Disable SSL/TLS
    #[arg(long)]
    pub no_ssl: bool,

    /// Nickname to use
    #[arg(long, short = 'n', default_value = DEFAULT_NAME)]
    pub nick: String,

    /// Username to use
    #[arg(long, short = 'u', default_value = DEFAULT_NAME)]
    pub user: String,

    /// Real name to use
    #[arg(long, short = 'r', default_value = DEFAULT_NAME)]
    pub realname: String,

    /// Channel to join
    #[arg(long, short = 'c', default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Server password, sent as PASS before registration
    #[arg(long)]
    pub pass: Option<String>,

    /// Print version
    #[arg(long, short = 'v', action = ArgAction::Version)]
    version: Option<bool>,
}

impl Args {
    /// Whether to perform the TLS handshake after connect.
    pub fn tls(&self) -> bool {
        !self.no_ssl
    }

    /// Resolve the flags into the session identity record.
    pub fn identity(&self) -> Identity {
        Identity {
            nickname: self.nick.clone(),
            username: self.user.clone(),
            realname: self.realname.clone(),
            channel: self.channel.clone(),
            server: self.server.clone(),
            pass: self.pass.clone(),
        }
    }
}
