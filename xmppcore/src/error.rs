use thiserror::Error;
use xmppcore_xml::XmlError;

/// Errors of the text-level entry points. Decoding an already parsed element
/// never fails; only turning text into an element can.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to parse stanza markup: {0}")]
    Xml(#[from] XmlError),
    #[error("expected <{expected}>, got <{found}>")]
    WrongTag {
        expected: &'static str,
        found: String,
    },
}
