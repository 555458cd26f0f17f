pub use xmppcore;
pub use xmppcore::{CodecError, DecodeOptions, Message};

pub mod config;
pub mod inspect;
