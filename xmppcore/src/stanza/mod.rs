//! Attributes and payloads shared by every stanza kind.
//!
//! The message codec only needs the pieces below: addressing, the stanza id
//! (including generating one on demand), `xml:lang` and the `<error/>` child.

pub mod error;

pub use error::{ErrorType, StanzaError};

use crate::protocol::ProtocolNode;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use xmppcore_xml::builder::NodeBuilder;
use xmppcore_xml::node::Node;

/// Generates a fresh stanza id: 10 random bytes, hex encoded.
pub fn generate_stanza_id() -> String {
    let mut random_bytes = [0u8; 10];
    rand::rng().fill_bytes(&mut random_bytes);
    format!("xm-{}", hex::encode(random_bytes))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanzaBase {
    pub id: String,
    pub from: String,
    pub to: String,
    pub lang: String,
    pub error: Option<StanzaError>,
}

impl StanzaBase {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    /// Reads the common attributes and the first `<error/>` child. A malformed
    /// error payload is dropped rather than failing the stanza.
    pub fn parse(node: &Node) -> Self {
        let mut attrs = node.attrs();
        let error = node
            .get_optional_child("error")
            .and_then(|e| match StanzaError::try_from_node(e) {
                Ok(error) => Some(error),
                Err(err) => {
                    log::warn!("Ignoring malformed stanza error payload: {err}");
                    None
                }
            });

        Self {
            id: attrs.string_or_empty("id"),
            from: attrs.string_or_empty("from"),
            to: attrs.string_or_empty("to"),
            lang: attrs.string_or_empty("xml:lang"),
            error,
        }
    }

    /// Writes `xml:lang`, `id`, `to` and `from`, skipping empty values.
    pub fn write_attrs(&self, builder: NodeBuilder) -> NodeBuilder {
        builder
            .attr_if_present("xml:lang", &self.lang)
            .attr_if_present("id", &self.id)
            .attr_if_present("to", &self.to)
            .attr_if_present("from", &self.from)
    }

    pub fn error_node(&self) -> Option<Node> {
        self.error.clone().map(ProtocolNode::into_node)
    }

    /// Assigns a generated id unless one is already set.
    pub fn assign_default_id_if_absent(&mut self) {
        if self.id.is_empty() {
            self.id = generate_stanza_id();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_stanza_id();
        let b = generate_stanza_id();
        assert!(a.starts_with("xm-"));
        assert_eq!(a.len(), 3 + 20);
        assert_ne!(a, b);
    }

    #[test]
    fn test_assign_default_id_is_idempotent() {
        let mut base = StanzaBase::new("romeo@example.net", "juliet@example.com");
        base.assign_default_id_if_absent();
        let first = base.id.clone();
        assert!(!first.is_empty());
        base.assign_default_id_if_absent();
        assert_eq!(base.id, first);
    }

    #[test]
    fn test_parse_and_write_attrs() {
        let node = NodeBuilder::new("message")
            .attr("from", "romeo@example.net/orchard")
            .attr("to", "juliet@example.com")
            .attr("id", "ktx72v49")
            .attr("xml:lang", "en")
            .build();

        let base = StanzaBase::parse(&node);
        assert_eq!(base.from, "romeo@example.net/orchard");
        assert_eq!(base.to, "juliet@example.com");
        assert_eq!(base.id, "ktx72v49");
        assert_eq!(base.lang, "en");
        assert!(base.error.is_none());

        let written = base.write_attrs(NodeBuilder::new("message")).build();
        assert_eq!(
            written.attrs.keys().collect::<Vec<_>>(),
            vec!["xml:lang", "id", "to", "from"]
        );
    }
}
