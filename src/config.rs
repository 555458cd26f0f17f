use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xmppcore::DecodeOptions;
use xmppcore::message::MAX_FORWARD_DEPTH;

#[derive(Parser, Debug)]
#[command(name = "xmpp-message", about = "Decode, encode and round-trip XMPP message stanzas")]
pub struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Deepest forwarded/archived/carbon nesting that is decoded.
    #[arg(long, global = true, env = "XMPP_MESSAGE_MAX_DEPTH", default_value_t = MAX_FORWARD_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read a stanza and print the decoded record as JSON.
    Decode { path: Option<PathBuf> },
    /// Read a JSON record and print the encoded stanza.
    Encode { path: Option<PathBuf> },
    /// Decode a stanza and print its canonical re-encoding.
    Roundtrip { path: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Decode,
    Encode,
    Roundtrip,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    /// `None` reads standard input.
    pub input: Option<PathBuf>,
    pub pretty: bool,
    pub max_depth: usize,
}

impl Config {
    pub fn new(mode: Mode, input: Option<PathBuf>) -> Self {
        Self {
            mode,
            input,
            pretty: false,
            max_depth: MAX_FORWARD_DEPTH,
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_forward_depth: self.max_depth,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let (mode, input) = match cli.command {
            Command::Decode { path } => (Mode::Decode, path),
            Command::Encode { path } => (Mode::Encode, path),
            Command::Roundtrip { path } => (Mode::Roundtrip, path),
        };
        Self {
            mode,
            input,
            pretty: cli.pretty,
            max_depth: cli.max_depth,
        }
    }
}
