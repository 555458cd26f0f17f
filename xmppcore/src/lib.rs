pub use xmppcore_xml as xml;

pub mod datetime;
pub mod error;
pub mod message;
pub mod ns;
pub mod protocol;
pub mod stanza;

pub use error::CodecError;
pub use message::{DecodeOptions, Message};
pub use protocol::ProtocolNode;
pub use stanza::{StanzaBase, StanzaError};
